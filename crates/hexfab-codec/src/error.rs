//! Codec errors: format problems, never solver problems.

use thiserror::Error;

/// Errors produced while encoding or decoding puzzle and solution files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("unsupported part record version {0}")]
    UnsupportedPartVersion(u8),

    #[error("invalid element byte {0:#04x}")]
    InvalidElement(u8),

    #[error("invalid opcode byte {0:#04x}")]
    InvalidOpcode(u8),

    #[error("unknown part name {0:?}")]
    UnknownPartName(String),

    #[error("string is not valid UTF-8")]
    InvalidString(#[from] std::string::FromUtf8Error),

    #[error("molecule coordinate {0} does not fit the wire format")]
    CoordinateOverflow(i32),

    #[error("production puzzles are not supported")]
    ProductionPuzzle,

    #[error("unexpected metric count {0} (expected 0 or 4)")]
    BadMetricCount(u32),

    #[error("unexpected metric numbering in solution file")]
    BadMetricNumbering,
}
