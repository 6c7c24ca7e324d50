//! Solver errors.

use thiserror::Error;

use hexfab_core::Element;

/// Errors that can occur while compiling a puzzle into a program.
///
/// Every variant is fatal for the whole request: the solver never returns
/// a partial program.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("puzzle has no reagents")]
    NoReagents,

    #[error("puzzle has no products")]
    NoProducts,

    #[error("too many reagents: {count} (at most {limit} stations)")]
    TooManyReagents { count: usize, limit: usize },

    #[error("too many products: {count} (at most {limit} stations)")]
    TooManyProducts { count: usize, limit: usize },

    #[error("reagent {index} has no atoms")]
    EmptyReagent { index: usize },

    #[error("product {index} has no atoms")]
    EmptyProduct { index: usize },

    #[error("product {product} requires {element} but no reagent supplies it")]
    ElementNotSupplied { product: usize, element: Element },

    #[error("product {product} carries a bond that is not a plain single bond")]
    NonNormalProductBond { product: usize },

    #[error("puzzle does not enable the required part kinds (arms, pistons, track, bonders, unbonders)")]
    PartsUnavailable,

    #[error("no reagent atom available for {element}")]
    NoCandidate { element: Element },

    #[error("dispensing for reagent {reagent} exceeded {limit} rows without draining its queue")]
    DispenseExhausted { reagent: usize, limit: usize },
}
