//! Placed parts and their cycle-indexed instruction streams.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::Hex;

/// Every kind of part a solution file can carry. The wire names are fixed
/// by the solution format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    Arm1,
    Arm2,
    Arm3,
    Arm6,
    Piston,
    Track,
    VanBerlo,
    Bonder,
    Unbonder,
    TriplexBonder,
    Multibonder,
    Calcification,
    Dispersion,
    Disposal,
    Duplication,
    Animismus,
    Equilibrium,
    Projection,
    Purification,
    Unification,
    Input,
    Output,
    OutputRepeating,
    Conduit,
}

impl PartKind {
    /// Name string used in solution files.
    pub fn wire_name(self) -> &'static str {
        match self {
            PartKind::Arm1 => "arm1",
            PartKind::Arm2 => "arm2",
            PartKind::Arm3 => "arm3",
            PartKind::Arm6 => "arm6",
            PartKind::Piston => "piston",
            PartKind::Track => "track",
            PartKind::VanBerlo => "baron",
            PartKind::Bonder => "bonder",
            PartKind::Unbonder => "unbonder",
            PartKind::TriplexBonder => "bonder-prisma",
            PartKind::Multibonder => "bonder-speed",
            PartKind::Calcification => "glyph-calcification",
            PartKind::Dispersion => "glyph-dispersion",
            PartKind::Disposal => "glyph-disposal",
            PartKind::Duplication => "glyph-duplication",
            PartKind::Animismus => "glyph-life-and-death",
            PartKind::Equilibrium => "glyph-marker",
            PartKind::Projection => "glyph-projection",
            PartKind::Purification => "glyph-purification",
            PartKind::Unification => "glyph-unification",
            PartKind::Input => "input",
            PartKind::Output => "out-std",
            PartKind::OutputRepeating => "out-rep",
            PartKind::Conduit => "pipe",
        }
    }

    /// Parse a wire name; `None` for unknown names.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Some(match name {
            "arm1" => PartKind::Arm1,
            "arm2" => PartKind::Arm2,
            "arm3" => PartKind::Arm3,
            "arm6" => PartKind::Arm6,
            "piston" => PartKind::Piston,
            "track" => PartKind::Track,
            "baron" => PartKind::VanBerlo,
            "bonder" => PartKind::Bonder,
            "unbonder" => PartKind::Unbonder,
            "bonder-prisma" => PartKind::TriplexBonder,
            "bonder-speed" => PartKind::Multibonder,
            "glyph-calcification" => PartKind::Calcification,
            "glyph-dispersion" => PartKind::Dispersion,
            "glyph-disposal" => PartKind::Disposal,
            "glyph-duplication" => PartKind::Duplication,
            "glyph-life-and-death" => PartKind::Animismus,
            "glyph-marker" => PartKind::Equilibrium,
            "glyph-projection" => PartKind::Projection,
            "glyph-purification" => PartKind::Purification,
            "glyph-unification" => PartKind::Unification,
            "input" => PartKind::Input,
            "out-std" => PartKind::Output,
            "out-rep" => PartKind::OutputRepeating,
            "pipe" => PartKind::Conduit,
            _ => return None,
        })
    }

    /// True for part kinds that execute instruction streams.
    pub fn is_arm(self) -> bool {
        matches!(
            self,
            PartKind::Arm1
                | PartKind::Arm2
                | PartKind::Arm3
                | PartKind::Arm6
                | PartKind::Piston
                | PartKind::VanBerlo
        )
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One discrete action an arm can execute on a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    RotateCw,
    RotateCcw,
    Extend,
    Retract,
    Grab,
    Drop,
    PivotCw,
    PivotCcw,
    TrackPlus,
    TrackMinus,
    Repeat,
    Reset,
    Noop,
}

impl Opcode {
    /// Wire byte used in solution files.
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::RotateCw => b'R',
            Opcode::RotateCcw => b'r',
            Opcode::Extend => b'E',
            Opcode::Retract => b'e',
            Opcode::Grab => b'G',
            Opcode::Drop => b'g',
            Opcode::PivotCw => b'P',
            Opcode::PivotCcw => b'p',
            Opcode::TrackPlus => b'A',
            Opcode::TrackMinus => b'a',
            Opcode::Repeat => b'C',
            Opcode::Reset => b'X',
            Opcode::Noop => b'O',
        }
    }

    /// Decode a wire byte; `None` for unknown bytes.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'R' => Opcode::RotateCw,
            b'r' => Opcode::RotateCcw,
            b'E' => Opcode::Extend,
            b'e' => Opcode::Retract,
            b'G' => Opcode::Grab,
            b'g' => Opcode::Drop,
            b'P' => Opcode::PivotCw,
            b'p' => Opcode::PivotCcw,
            b'A' => Opcode::TrackPlus,
            b'a' => Opcode::TrackMinus,
            b'C' => Opcode::Repeat,
            b'X' => Opcode::Reset,
            b'O' => Opcode::Noop,
            _ => return None,
        })
    }
}

/// One timed action in an arm's instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Absolute cycle on which the action executes.
    pub index: i32,
    pub op: Opcode,
}

impl Instruction {
    pub fn new(index: i32, op: Opcode) -> Self {
        Self { index, op }
    }
}

/// A placed part in a solution.
///
/// Only the fields relevant to the part's kind are meaningful: `length` for
/// arms, `io_index` for inputs and outputs, `track_hexes` for track,
/// `instructions` for arm kinds, and the conduit fields for conduits. The
/// remaining fields keep their defaults and round-trip through the codec
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub kind: PartKind,
    pub position: Hex,
    pub length: u32,
    pub rotation: i32,
    /// Which reagent or product an input/output serves.
    pub io_index: u32,
    pub instructions: Vec<Instruction>,
    pub track_hexes: Vec<Hex>,
    pub arm_number: u32,
    pub conduit_id: u32,
    pub conduit_hexes: Vec<Hex>,
}

impl Part {
    fn base(kind: PartKind) -> Self {
        Self {
            kind,
            position: Hex::new(0, 0),
            length: 0,
            rotation: 0,
            io_index: 0,
            instructions: Vec::new(),
            track_hexes: Vec::new(),
            arm_number: 0,
            conduit_id: 0,
            conduit_hexes: Vec::new(),
        }
    }

    /// A stationary glyph (bonder, unbonder, ...).
    pub fn glyph(kind: PartKind, position: Hex, rotation: i32) -> Self {
        Self {
            position,
            rotation,
            ..Self::base(kind)
        }
    }

    /// An arm of the given length.
    pub fn arm(kind: PartKind, position: Hex, rotation: i32, length: u32) -> Self {
        Self {
            position,
            rotation,
            length,
            ..Self::base(kind)
        }
    }

    /// A track covering the given cells.
    pub fn track(cells: Vec<Hex>) -> Self {
        Self {
            track_hexes: cells,
            ..Self::base(PartKind::Track)
        }
    }

    /// An input or output port bound to reagent/product `io_index`.
    pub fn io(kind: PartKind, position: Hex, rotation: i32, io_index: u32) -> Self {
        Self {
            position,
            rotation,
            io_index,
            ..Self::base(kind)
        }
    }
}
