//! Binary codec for hexfab puzzle and solution files.
//!
//! Both file kinds are little-endian struct layouts with varint-length
//! strings and a leading format version. Format problems (bad version,
//! truncated buffer, unknown bytes) surface as [`CodecError`], a kind
//! deliberately distinct from solver errors: a file that fails to decode
//! never reaches the solver at all.

pub mod error;
pub mod puzzle;
pub mod solution;
pub mod wire;

pub use error::CodecError;
pub use puzzle::{decode_puzzle, encode_puzzle, PUZZLE_VERSION};
pub use solution::{decode_solution, encode_solution, PART_VERSION, SOLUTION_VERSION};
