//! Puzzles: the transformation request the compiler consumes.

use serde::{Deserialize, Serialize};

use crate::molecule::Molecule;

/// Bitmask of part kinds a puzzle allows solutions to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartsAvailable {
    bits: u64,
}

impl PartsAvailable {
    pub const ARM: u64 = 1 << 0;
    pub const MULTIARM: u64 = 1 << 1;
    pub const PISTON: u64 = 1 << 2;
    pub const TRACK: u64 = 1 << 3;
    pub const BONDER: u64 = 1 << 8;
    pub const UNBONDER: u64 = 1 << 9;
    pub const MULTIBONDER: u64 = 1 << 10;
    pub const TRIPLEX: u64 = 1 << 11;
    pub const CALCIFICATION: u64 = 1 << 12;
    pub const DUPLICATION: u64 = 1 << 13;
    pub const PROJECTION: u64 = 1 << 14;
    pub const PURIFICATION: u64 = 1 << 15;
    pub const ANIMISMUS: u64 = 1 << 16;
    pub const DISPOSAL: u64 = 1 << 17;
    pub const QUINTESSENCE: u64 = 1 << 18;
    pub const GRAB_AND_ROTATE: u64 = 1 << 22;
    pub const DROP: u64 = 1 << 23;
    pub const RESET: u64 = 1 << 24;
    pub const REPEAT: u64 = 1 << 25;
    pub const PIVOT: u64 = 1 << 26;
    pub const BERLO: u64 = 1 << 28;

    /// The standard editor default.
    pub const DEFAULT: u64 = 0x07C0_170F;

    pub fn new(bits: u64) -> Self {
        Self { bits }
    }

    /// True when every flag in `flags` is enabled.
    pub fn allows(&self, flags: u64) -> bool {
        self.bits & flags == flags
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }
}

impl Default for PartsAvailable {
    fn default() -> Self {
        Self {
            bits: Self::DEFAULT,
        }
    }
}

/// A transformation request: reagents in, products out, plus the metadata
/// the file format carries alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub name: String,
    pub creator: u64,
    pub parts_available: PartsAvailable,
    pub reagents: Vec<Molecule>,
    pub products: Vec<Molecule>,
    pub output_scale: u32,
}

impl Puzzle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creator: 0,
            parts_available: PartsAvailable::default(),
            reagents: Vec::new(),
            products: Vec::new(),
            output_scale: 1,
        }
    }
}
