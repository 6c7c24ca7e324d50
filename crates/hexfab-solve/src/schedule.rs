//! The greedy feed scheduler: one committed source atom per product atom.
//!
//! A single ordered pass walks every product atom in raster order. For
//! each one it asks every reagent stream "when could you next have an
//! atom of this element ready?", commits the earliest answer, advances
//! the global clock, and charges the resulting delay back into that
//! stream's row-delay bookkeeping so later candidates from the same
//! stream see the cost. There is no backtracking: once committed, a
//! decision is final and the emitter reproduces it verbatim.

use std::collections::{HashMap, VecDeque};

use log::debug;
use serde::Serialize;

use hexfab_core::Element;

use crate::bonds::AssemblyPlan;
use crate::error::SolveError;
use crate::layout::ReagentLayout;

/// Hard ceiling on accumulated dispensing rows for one reagent. Hitting
/// it means the request cannot be satisfied by looping the reagent.
pub const MAX_DISPENSE_ROWS: usize = 100;

/// One committed scheduling decision.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledAtom {
    pub element: Element,
    /// Index of the reagent stream that supplies the atom.
    pub reagent: usize,
    /// Index of the product the atom is delivered to.
    pub product: usize,
    /// Dispensing rank of the source atom within its reagent.
    pub order: usize,
    /// Local coordinates of the source atom.
    pub x: i32,
    pub y: i32,
    /// Absolute cycle on which the atom reaches the shared transport.
    pub cycle: i64,
    /// Idle cycles inserted to honor the minimum delivery gap.
    pub delay: i64,
}

/// The complete committed schedule.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// All decisions in commit (= product raster) order.
    pub atoms: Vec<ScheduledAtom>,
    /// Indices into `atoms`, split per source reagent.
    pub per_reagent: Vec<Vec<usize>>,
    /// Per reagent, one entry per commit from that reagent: the stall the
    /// extraction stage must absorb when the shared transport switches
    /// onto this stream (zero while the stream keeps the transport).
    pub switch_stalls: Vec<Vec<i64>>,
}

/// Mutable scheduler state for one reagent stream. Single-writer by
/// construction: only commits sourced from this stream touch it.
#[derive(Debug)]
struct ReagentState {
    /// Completed full dispensing passes.
    loops: i64,
    /// Local coordinates of the most recently committed atom.
    position: (i32, i32),
    /// Cost of each completed dispensing row, oldest first.
    past_row_delays: Vec<i64>,
    /// Accumulated intra-row cost per (row, pass) bucket.
    row_buckets: HashMap<(i32, i64), i64>,
    /// Pull columns committed in the currently open row.
    row_pulls: Vec<i64>,
    /// Delays committed in the currently open row.
    row_delays: Vec<i64>,
}

impl ReagentState {
    fn new() -> Self {
        Self {
            loops: 0,
            position: (-1, -1),
            past_row_delays: Vec::new(),
            row_buckets: HashMap::new(),
            row_pulls: Vec::new(),
            row_delays: Vec::new(),
        }
    }
}

/// Compute the full schedule for the given reagents and assembly plans.
pub fn compute_schedule(
    reagents: &[ReagentLayout],
    plans: &[AssemblyPlan],
) -> Result<Schedule, SolveError> {
    let mut states: Vec<ReagentState> = reagents.iter().map(|_| ReagentState::new()).collect();
    let mut atoms: Vec<ScheduledAtom> = Vec::new();
    let mut per_reagent: Vec<Vec<usize>> = vec![Vec::new(); reagents.len()];
    let mut switch_stalls: Vec<Vec<i64>> = vec![Vec::new(); reagents.len()];

    let mut clock = 0;
    let mut last_reagent: Option<usize> = None;

    for (product, plan) in plans.iter().enumerate() {
        for target in &plan.atoms {
            // Candidate generation: earliest ready-cycle over every
            // matching atom of every stream. Ties keep the first
            // candidate in enumeration order.
            let mut best: Option<(i64, usize, usize, bool)> = None;
            for (reagent, layout) in reagents.iter().enumerate() {
                let state = &states[reagent];
                for atom in &layout.atoms {
                    if atom.element != target.element {
                        continue;
                    }
                    let upcoming = atom.y > state.position.1
                        || (atom.x > state.position.0 && atom.y == state.position.1);
                    let pass = state.loops + if upcoming { 0 } else { 1 };
                    let bucket = state
                        .row_buckets
                        .get(&(atom.y, pass))
                        .copied()
                        .unwrap_or(0);

                    let mut ready = atom.key + layout.footprint.decomposition_time() * pass;
                    // Completed rows always cost their recorded delay,
                    // except the newest one, whose cost lives in the
                    // still-open bucket once that bucket has been touched.
                    ready += if bucket == 0 {
                        state.past_row_delays.iter().sum::<i64>()
                    } else {
                        let keep = state.past_row_delays.len().saturating_sub(1);
                        state.past_row_delays[..keep].iter().sum::<i64>()
                    };
                    ready += bucket;

                    if best.map_or(true, |(b, ..)| ready < b) {
                        best = Some((ready, reagent, atom.order, upcoming));
                    }
                }
            }
            let (ready, reagent, order, upcoming) = best.ok_or(SolveError::NoCandidate {
                element: target.element,
            })?;
            let source = &reagents[reagent].atoms[order];

            // Commit: push the ready cycle out to honor the gap, then
            // advance the global clock to the committed cycle.
            let delay = (clock + target.min_gap - ready).max(0);
            let cycle = ready + delay;
            clock = cycle;

            debug!(
                "need {} -> reagent {} atom ({}, {}) ready {} delay {} cycle {}",
                target.element, reagent, source.x, source.y, ready, delay, cycle
            );

            let state = &mut states[reagent];
            let pass = state.loops + if upcoming { 0 } else { 1 };
            let opens_row = state
                .row_buckets
                .get(&(source.y, pass))
                .copied()
                .unwrap_or(0)
                == 0;
            if !upcoming {
                state.loops += 1;
            }
            if opens_row {
                state.past_row_delays.push(3);
                state.row_pulls.clear();
                state.row_delays.clear();
            }

            *state
                .row_buckets
                .entry((source.y, state.loops))
                .or_insert(0) += 2 * source.x as i64 + 6 + delay;
            state.position = (source.x, source.y);
            state.row_pulls.push(source.x as i64 + 1);
            state.row_delays.push(delay);

            // Freeze the open row's cost as seen from later rows: the
            // per-pull slowness minus the boundary correction, floored at
            // zero, plus all delays charged into the row so far.
            let slowness: i64 = state.row_pulls.iter().map(|p| 2 * p + 4).sum();
            let last_pull = state.row_pulls.last().copied().unwrap_or(0);
            let width = reagents[reagent].footprint.width as i64;
            let passed = (slowness - (last_pull + 3) - (width + 7)).max(0);
            let row_cost = state.row_delays.iter().sum::<i64>() + passed + 3;
            if let Some(newest) = state.past_row_delays.last_mut() {
                *newest = row_cost;
            }

            switch_stalls[reagent].push(if last_reagent == Some(reagent) { 0 } else { delay });
            last_reagent = Some(reagent);

            per_reagent[reagent].push(atoms.len());
            atoms.push(ScheduledAtom {
                element: target.element,
                reagent,
                product,
                order,
                x: source.x,
                y: source.y,
                cycle,
                delay,
            });
        }
    }

    Ok(Schedule {
        atoms,
        per_reagent,
        switch_stalls,
    })
}

/// Row-by-row pull plan for one reagent's extraction stage.
#[derive(Debug, Clone)]
pub struct DispensePlan {
    /// Pull columns (1-based from the track end) per dispensing row,
    /// `passes * height` rows in total.
    pub rows: Vec<Vec<i64>>,
    /// Idle cycles to absorb after each row.
    pub row_delays: Vec<i64>,
    /// Full dispensing passes required.
    pub passes: usize,
}

/// Derive the extraction stage's pull plan from the committed schedule.
///
/// Walks the reagent's raster repeatedly, consuming the committed orders
/// in sequence; each extra walk is one more full dispensing pass. Aborts
/// once the accumulated rows exceed [`MAX_DISPENSE_ROWS`], which can only
/// happen when the commit sequence cannot be dispensed.
pub fn plan_dispense(
    layout: &ReagentLayout,
    schedule: &Schedule,
    reagent: usize,
) -> Result<DispensePlan, SolveError> {
    let height = layout.footprint.height as usize;
    let width = layout.footprint.width as i64;

    let mut queue: VecDeque<usize> = schedule.per_reagent[reagent]
        .iter()
        .map(|&i| schedule.atoms[i].order)
        .collect();

    let mut rows: Vec<Vec<i64>> = Vec::new();
    let mut passes = 0;
    while !queue.is_empty() {
        for _ in 0..height {
            rows.push(Vec::new());
        }
        for atom in &layout.atoms {
            if queue.front() == Some(&atom.order) {
                queue.pop_front();
                rows[passes * height + atom.y as usize].push(atom.x as i64 + 1);
            }
        }
        passes += 1;
        if rows.len() > MAX_DISPENSE_ROWS {
            return Err(SolveError::DispenseExhausted {
                reagent,
                limit: MAX_DISPENSE_ROWS,
            });
        }
    }

    let row_delays = rows
        .iter()
        .map(|row| match row.last() {
            None => 0,
            Some(&last) => {
                let slowness: i64 = row.iter().map(|p| 2 * p + 4).sum();
                (slowness - (last + 3) - (width + 7)).max(0)
            }
        })
        .collect();

    Ok(DispensePlan {
        rows,
        row_delays,
        passes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonds::{assign_minimum_gaps, resolve_bonds};
    use crate::layout::ProductLayout;
    use hexfab_core::{Atom, Bond, Hex, Molecule};

    fn water_pair() -> Molecule {
        Molecule::from_parts(
            vec![
                Atom::new(Element::Water, Hex::new(0, 0)),
                Atom::new(Element::Water, Hex::new(1, 0)),
            ],
            vec![Bond::normal(Hex::new(0, 0), Hex::new(1, 0))],
        )
    }

    fn plans_for(products: &[Molecule]) -> Vec<AssemblyPlan> {
        let mut plans: Vec<AssemblyPlan> = products
            .iter()
            .map(|m| resolve_bonds(m, &ProductLayout::analyze(m)))
            .collect();
        assign_minimum_gaps(&mut plans);
        plans
    }

    #[test]
    fn pair_schedule_has_no_delays() {
        let reagent = water_pair();
        let reagents = vec![ReagentLayout::analyze(&reagent)];
        let plans = plans_for(&[water_pair()]);

        let schedule = compute_schedule(&reagents, &plans).unwrap();
        assert_eq!(schedule.atoms.len(), 2);
        assert_eq!(schedule.atoms[0].delay, 0);
        assert_eq!(schedule.atoms[1].delay, 0);
        assert_eq!(schedule.atoms[0].cycle, 14);
        assert_eq!(schedule.atoms[1].cycle, 22);
        // Both atoms come from the only reagent, distinct source atoms.
        assert_eq!(schedule.atoms[0].order, 0);
        assert_eq!(schedule.atoms[1].order, 1);
    }

    #[test]
    fn cycles_are_strictly_increasing() {
        let reagent = Molecule::from_parts(
            vec![
                Atom::new(Element::Salt, Hex::new(0, 0)),
                Atom::new(Element::Salt, Hex::new(1, 0)),
                Atom::new(Element::Salt, Hex::new(0, 1)),
            ],
            vec![],
        );
        let product = reagent.clone();
        let reagents = vec![ReagentLayout::analyze(&reagent)];
        let plans = plans_for(&[product]);

        let schedule = compute_schedule(&reagents, &plans).unwrap();
        assert_eq!(schedule.atoms.len(), 3);
        for pair in schedule.atoms.windows(2) {
            assert!(pair[0].cycle < pair[1].cycle);
        }
    }

    #[test]
    fn consecutive_deliveries_honor_min_gap() {
        let reagent = Molecule::from_parts(
            vec![
                Atom::new(Element::Salt, Hex::new(0, 0)),
                Atom::new(Element::Salt, Hex::new(1, 0)),
            ],
            vec![],
        );
        let reagents = vec![ReagentLayout::analyze(&reagent)];
        let plans = plans_for(&[reagent.clone()]);
        let gaps: Vec<i64> = plans[0].atoms.iter().map(|a| a.min_gap).collect();

        let schedule = compute_schedule(&reagents, &plans).unwrap();
        for (i, pair) in schedule.atoms.windows(2).enumerate() {
            assert!(pair[1].cycle - pair[0].cycle >= gaps[i + 1]);
        }
    }

    #[test]
    fn looping_reuses_the_same_source_one_pass_later() {
        // One single-atom reagent must supply two product atoms: the
        // second delivery needs a full extra dispensing pass.
        let reagent = Molecule::from_parts(
            vec![Atom::new(Element::Salt, Hex::new(0, 0))],
            vec![],
        );
        let product = Molecule::from_parts(
            vec![
                Atom::new(Element::Salt, Hex::new(0, 0)),
                Atom::new(Element::Salt, Hex::new(0, 1)),
            ],
            vec![],
        );
        let reagents = vec![ReagentLayout::analyze(&reagent)];
        let plans = plans_for(&[product]);

        let schedule = compute_schedule(&reagents, &plans).unwrap();
        assert_eq!(schedule.atoms[0].order, 0);
        assert_eq!(schedule.atoms[1].order, 0);
        let decomposition = reagents[0].footprint.decomposition_time();
        assert!(schedule.atoms[1].cycle - schedule.atoms[0].cycle >= decomposition);
    }

    #[test]
    fn tied_candidates_resolve_to_first_reagent() {
        // Two identical reagents tie exactly on every ready-cycle for the
        // opening commit; the first by enumeration order must win it. The
        // second commit then genuinely favors the untouched stream, whose
        // own first atom is still cheaper than its rival's second.
        let reagents = vec![
            ReagentLayout::analyze(&water_pair()),
            ReagentLayout::analyze(&water_pair()),
        ];
        let plans = plans_for(&[water_pair()]);

        let schedule = compute_schedule(&reagents, &plans).unwrap();
        assert_eq!(schedule.atoms[0].reagent, 0);
        assert_eq!(schedule.atoms[1].reagent, 1);
    }

    #[test]
    fn product_atoms_map_to_distinct_source_instances() {
        let reagent = Molecule::from_parts(
            vec![
                Atom::new(Element::Salt, Hex::new(0, 0)),
                Atom::new(Element::Fire, Hex::new(1, 0)),
            ],
            vec![],
        );
        let product = reagent.clone();
        let reagents = vec![ReagentLayout::analyze(&reagent)];
        let plans = plans_for(&[product.clone(), product]);

        let schedule = compute_schedule(&reagents, &plans).unwrap();
        // (reagent, order, cycle) identifies a physical atom instance;
        // no two product atoms may share one.
        let mut seen = std::collections::HashSet::new();
        for atom in &schedule.atoms {
            assert!(seen.insert((atom.reagent, atom.order, atom.cycle)));
        }
    }

    #[test]
    fn switch_stalls_follow_stream_changes() {
        let reagents = vec![ReagentLayout::analyze(&water_pair())];
        let plans = plans_for(&[water_pair()]);
        let schedule = compute_schedule(&reagents, &plans).unwrap();
        // Single stream: first commit switches onto it, the second keeps it.
        assert_eq!(schedule.switch_stalls[0].len(), 2);
        assert_eq!(schedule.switch_stalls[0][1], 0);
    }

    #[test]
    fn dispense_plan_matches_pair_schedule() {
        let reagents = vec![ReagentLayout::analyze(&water_pair())];
        let plans = plans_for(&[water_pair()]);
        let schedule = compute_schedule(&reagents, &plans).unwrap();

        let plan = plan_dispense(&reagents[0], &schedule, 0).unwrap();
        assert_eq!(plan.passes, 1);
        assert_eq!(plan.rows, vec![vec![1, 2]]);
        assert_eq!(plan.row_delays, vec![0]);
    }

    #[test]
    fn unused_reagent_gets_empty_plan() {
        let reagents = vec![
            ReagentLayout::analyze(&water_pair()),
            ReagentLayout::analyze(&water_pair()),
        ];
        let plans = plans_for(&[water_pair()]);
        let schedule = compute_schedule(&reagents, &plans).unwrap();

        let plan = plan_dispense(&reagents[1], &schedule, 1).unwrap();
        assert_eq!(plan.passes, 0);
        assert!(plan.rows.is_empty());
    }

    #[test]
    fn exhaustion_bound_aborts_runaway_dispensing() {
        // A single-atom reagent asked for 101 deliveries needs 101
        // dispensing passes of one row each, tripping the bound.
        let reagent = Molecule::from_parts(
            vec![Atom::new(Element::Salt, Hex::new(0, 0))],
            vec![],
        );
        let layout = ReagentLayout::analyze(&reagent);
        let atoms: Vec<ScheduledAtom> = (0..=MAX_DISPENSE_ROWS as i64)
            .map(|i| ScheduledAtom {
                element: Element::Salt,
                reagent: 0,
                product: 0,
                order: 0,
                x: 0,
                y: 0,
                cycle: 14 + 16 * i,
                delay: 0,
            })
            .collect();
        let schedule = Schedule {
            per_reagent: vec![(0..atoms.len()).collect()],
            switch_stalls: vec![vec![0; atoms.len()]],
            atoms,
        };

        let err = plan_dispense(&layout, &schedule, 0).unwrap_err();
        assert!(matches!(
            err,
            SolveError::DispenseExhausted {
                reagent: 0,
                limit: MAX_DISPENSE_ROWS
            }
        ));
    }
}
