//! Axial coordinates on the hexagonal grid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position on the hexagonal grid in axial coordinates.
///
/// `u` grows to the right along a row; `v` selects the row. All grid
/// arithmetic in the workspace is exact integer arithmetic on these two
/// components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub u: i32,
    pub v: i32,
}

impl Hex {
    pub const fn new(u: i32, v: i32) -> Self {
        Self { u, v }
    }
}

impl From<(i32, i32)> for Hex {
    fn from((u, v): (i32, i32)) -> Self {
        Self { u, v }
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(Hex::new(3, -2).to_string(), "(3, -2)");
    }

    #[test]
    fn from_tuple() {
        assert_eq!(Hex::from((1, 2)), Hex::new(1, 2));
    }
}
