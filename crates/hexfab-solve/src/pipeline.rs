//! Solver pipeline: gate, layout, bond resolution, scheduling, dispense
//! planning, emission.

use log::debug;
use serde::Serialize;

use hexfab_core::{Part, Puzzle};

use crate::bonds::{assign_minimum_gaps, resolve_bonds, AssemblyPlan};
use crate::emit::emit_program;
use crate::error::SolveError;
use crate::gate::check_feasible;
use crate::layout::{ProductLayout, ReagentLayout};
use crate::schedule::{compute_schedule, plan_dispense};

/// Summary statistics of a successful solve.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub reagents: usize,
    pub products: usize,
    /// Committed scheduling decisions (one per product atom).
    pub scheduled_atoms: usize,
    /// Cycle of the last delivery onto shared transport.
    pub final_cycle: i64,
    /// Dispensing passes per reagent.
    pub passes: Vec<usize>,
    pub parts: usize,
    pub instructions: usize,
}

/// A compiled program plus its report.
#[derive(Debug)]
pub struct SolveOutput {
    pub parts: Vec<Part>,
    pub report: SolveReport,
}

/// Compile a puzzle into a timed machine program.
///
/// Runs the full pipeline and returns either a complete program or the
/// first error encountered; nothing partial ever escapes.
pub fn solve(puzzle: &Puzzle) -> Result<SolveOutput, SolveError> {
    check_feasible(puzzle)?;

    let reagents: Vec<ReagentLayout> = puzzle.reagents.iter().map(ReagentLayout::analyze).collect();
    let products: Vec<ProductLayout> = puzzle.products.iter().map(ProductLayout::analyze).collect();

    let mut plans: Vec<AssemblyPlan> = puzzle
        .products
        .iter()
        .zip(&products)
        .map(|(molecule, layout)| resolve_bonds(molecule, layout))
        .collect();
    assign_minimum_gaps(&mut plans);

    let schedule = compute_schedule(&reagents, &plans)?;
    debug!(
        "{}: committed {} atoms, last on cycle {}",
        puzzle.name,
        schedule.atoms.len(),
        schedule.atoms.last().map(|a| a.cycle).unwrap_or(0)
    );

    let dispense = (0..reagents.len())
        .map(|reagent| plan_dispense(&reagents[reagent], &schedule, reagent))
        .collect::<Result<Vec<_>, _>>()?;

    let parts = emit_program(&reagents, &plans, &schedule, &dispense);

    let report = SolveReport {
        reagents: reagents.len(),
        products: plans.len(),
        scheduled_atoms: schedule.atoms.len(),
        final_cycle: schedule.atoms.last().map(|a| a.cycle).unwrap_or(0),
        passes: dispense.iter().map(|p| p.passes).collect(),
        instructions: parts.iter().map(|p| p.instructions.len()).sum(),
        parts: parts.len(),
    };

    Ok(SolveOutput { parts, report })
}
