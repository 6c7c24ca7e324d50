//! Verification surfaces for hexfab programs.
//!
//! Two layers: [`conformance`] statically checks the properties the
//! compiler guarantees by construction (exclusive cycle reservation per
//! arm, ordered commits, no pre-zero actions), and [`oracle`] defines the
//! contract of the external replay engine that delivers the final
//! verdict. The compiler itself never links against a replay engine.

pub mod conformance;
pub mod oracle;

pub use conformance::{check_program, is_clean, Diagnostic, Severity};
pub use oracle::{Oracle, OracleError, OracleFailure};
