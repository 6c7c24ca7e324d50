//! Solutions: the compiler's final artifact.

use serde::{Deserialize, Serialize};

use crate::part::Part;

/// Recorded metrics of a previously simulated solution. Present only in
/// files written back by the game or a verifier; the compiler emits
/// solutions without them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionMetrics {
    pub cycles: u32,
    pub cost: u32,
    pub area: u32,
    pub instructions: u32,
}

/// A complete machine program for one puzzle: placed parts, with arm-like
/// parts carrying their timed instruction streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// File name of the puzzle this program solves (without extension).
    pub puzzle: String,
    /// Display name of the solution.
    pub name: String,
    pub metrics: Option<SolutionMetrics>,
    pub parts: Vec<Part>,
}

impl Solution {
    pub fn new(puzzle: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            puzzle: puzzle.into(),
            name: name.into(),
            metrics: None,
            parts: Vec::new(),
        }
    }
}
