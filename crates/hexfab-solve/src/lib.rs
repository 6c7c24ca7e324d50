//! Machine-program compiler for hexfab puzzles.
//!
//! Turns a transformation request (reagent and product molecules on a hex
//! grid) into a fully timed, collision-free program of stations, rails,
//! and per-arm instruction streams, through a fixed pipeline: feasibility
//! gate, layout analysis, bond resolution, greedy feed scheduling,
//! dispense planning, and instruction emission.
//!
//! The scheduler is a deterministic greedy heuristic: it commits, for
//! every product atom in raster order, the reagent atom with the earliest
//! feasible delivery cycle, and never revisits a decision. Cycle counts
//! are therefore sound but not minimal.

pub mod bonds;
pub mod emit;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod layout;
pub mod pipeline;
pub mod schedule;

pub use bonds::{assign_minimum_gaps, resolve_bonds, AssemblyPlan, BondMask, MIN_DELIVERY_GAP};
pub use emit::emit_program;
pub use error::SolveError;
pub use gate::check_feasible;
pub use layout::{Footprint, ProductLayout, RankedAtom, ReagentLayout};
pub use pipeline::{solve, SolveOutput, SolveReport};
pub use schedule::{
    compute_schedule, plan_dispense, DispensePlan, Schedule, ScheduledAtom, MAX_DISPENSE_ROWS,
};
