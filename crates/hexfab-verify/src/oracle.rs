//! Interface to the external verification engine.
//!
//! The engine replays an encoded puzzle/solution pair and answers named
//! metric queries (total cycles, cost, area, ...) or reports a structured
//! failure. The compiler treats it as a black box: it never inspects a
//! failure beyond surfacing it, and it never retries a failing program.

use std::fmt;

use thiserror::Error;

use hexfab_core::Hex;

/// A structured failure reported by the verifier: what went wrong, when,
/// and where on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleFailure {
    pub message: String,
    pub cycle: i32,
    pub location: Hex,
}

impl fmt::Display for OracleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} on cycle {}",
            self.message, self.location, self.cycle
        )
    }
}

/// Errors surfaced by an [`Oracle`].
#[derive(Debug, Error)]
pub enum OracleError {
    /// The program was replayed and found faulty.
    #[error("program rejected: {0}")]
    Rejected(OracleFailure),

    /// The metric name is not one the engine knows.
    #[error("unknown metric {0:?}")]
    UnknownMetric(String),

    /// The engine itself could not run.
    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// A verification engine bound to one puzzle/solution pair.
pub trait Oracle {
    /// Evaluate a named metric, replaying the program if necessary.
    fn metric(&mut self, name: &str) -> Result<i64, OracleError>;
}
