//! Pre-flight feasibility checks, run before any layout or scheduling
//! work. A failed check rejects the whole request; no partial program is
//! ever produced.

use std::collections::HashSet;

use hexfab_core::{Element, PartsAvailable, Puzzle};

use crate::error::SolveError;
use crate::geometry::STATION_COUNT;

/// Part kinds every emitted program uses.
const REQUIRED_PARTS: u64 = PartsAvailable::ARM
    | PartsAvailable::PISTON
    | PartsAvailable::TRACK
    | PartsAvailable::BONDER
    | PartsAvailable::UNBONDER;

/// Check that a puzzle is one the solver can compile.
pub fn check_feasible(puzzle: &Puzzle) -> Result<(), SolveError> {
    if puzzle.reagents.is_empty() {
        return Err(SolveError::NoReagents);
    }
    if puzzle.products.is_empty() {
        return Err(SolveError::NoProducts);
    }
    if puzzle.reagents.len() > STATION_COUNT {
        return Err(SolveError::TooManyReagents {
            count: puzzle.reagents.len(),
            limit: STATION_COUNT,
        });
    }
    if puzzle.products.len() > STATION_COUNT {
        return Err(SolveError::TooManyProducts {
            count: puzzle.products.len(),
            limit: STATION_COUNT,
        });
    }

    for (index, reagent) in puzzle.reagents.iter().enumerate() {
        if reagent.atoms.is_empty() {
            return Err(SolveError::EmptyReagent { index });
        }
    }
    for (index, product) in puzzle.products.iter().enumerate() {
        if product.atoms.is_empty() {
            return Err(SolveError::EmptyProduct { index });
        }
    }

    let supplied: HashSet<Element> = puzzle
        .reagents
        .iter()
        .flat_map(|m| m.elements())
        .collect();
    for (index, product) in puzzle.products.iter().enumerate() {
        for element in product.elements() {
            if !supplied.contains(&element) {
                return Err(SolveError::ElementNotSupplied {
                    product: index,
                    element,
                });
            }
        }
        for bond in &product.bonds {
            if !bond.kind.is_normal() {
                return Err(SolveError::NonNormalProductBond { product: index });
            }
        }
    }

    if !puzzle.parts_available.allows(REQUIRED_PARTS) {
        return Err(SolveError::PartsUnavailable);
    }

    Ok(())
}
