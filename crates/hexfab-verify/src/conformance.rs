//! Structural conformance checks over an emitted program.
//!
//! These validate only what the compiler itself constructs: every arm's
//! instruction stream must claim each cycle at most once, in the order it
//! was committed, and never before cycle zero. They are not a replay
//! engine; whether the program actually assembles the products is the
//! external verifier's verdict.

use std::collections::HashSet;

use hexfab_core::Part;

/// Severity of a conformance diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic produced by [`check_program`].
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Index of the offending part in the program's part list.
    pub part: usize,
    pub message: String,
}

/// Check a program's instruction streams.
pub fn check_program(parts: &[Part]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (index, part) in parts.iter().enumerate() {
        if part.instructions.is_empty() {
            continue;
        }

        if !part.kind.is_arm() {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                part: index,
                message: format!(
                    "{} at {} carries {} instructions but cannot execute them",
                    part.kind,
                    part.position,
                    part.instructions.len()
                ),
            });
        }

        let mut seen = HashSet::new();
        for instruction in &part.instructions {
            if instruction.index < 0 {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    part: index,
                    message: format!(
                        "{} at {} schedules an action before cycle 0 (index {})",
                        part.kind, part.position, instruction.index
                    ),
                });
            }
            if !seen.insert(instruction.index) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    part: index,
                    message: format!(
                        "{} at {} claims cycle {} twice",
                        part.kind, part.position, instruction.index
                    ),
                });
            }
        }

        for pair in part.instructions.windows(2) {
            if pair[1].index < pair[0].index {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    part: index,
                    message: format!(
                        "{} at {} commits cycle {} after cycle {}",
                        part.kind, part.position, pair[1].index, pair[0].index
                    ),
                });
                break;
            }
        }
    }

    diagnostics
}

/// True when no diagnostic is an error.
pub fn is_clean(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().all(|d| d.severity != Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfab_core::{Hex, Instruction, Opcode, Part, PartKind};

    fn arm_with(indices: &[i32]) -> Part {
        let mut arm = Part::arm(PartKind::Arm1, Hex::new(0, 0), 0, 2);
        for &index in indices {
            arm.instructions.push(Instruction::new(index, Opcode::Grab));
        }
        arm
    }

    #[test]
    fn clean_program_passes() {
        let parts = vec![arm_with(&[0, 1, 5, 9])];
        let diagnostics = check_program(&parts);
        assert!(diagnostics.is_empty());
        assert!(is_clean(&diagnostics));
    }

    #[test]
    fn duplicate_cycle_is_an_error() {
        let parts = vec![arm_with(&[0, 3, 3])];
        let diagnostics = check_program(&parts);
        assert!(!is_clean(&diagnostics));
        assert!(diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error && d.message.contains("twice")));
    }

    #[test]
    fn out_of_order_commit_is_an_error() {
        let parts = vec![arm_with(&[5, 2])];
        let diagnostics = check_program(&parts);
        assert!(!is_clean(&diagnostics));
    }

    #[test]
    fn negative_index_is_an_error() {
        let parts = vec![arm_with(&[-1, 0])];
        let diagnostics = check_program(&parts);
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("before cycle 0")));
    }

    #[test]
    fn instructions_on_glyph_warn_but_stay_clean() {
        let mut glyph = Part::glyph(PartKind::Bonder, Hex::new(1, 1), 0);
        glyph.instructions.push(Instruction::new(0, Opcode::Grab));
        let diagnostics = check_program(&[glyph]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert!(is_clean(&diagnostics));
    }

    #[test]
    fn parts_without_instructions_are_ignored() {
        let parts = vec![
            Part::glyph(PartKind::Bonder, Hex::new(0, 0), 0),
            Part::track(vec![Hex::new(0, 0)]),
        ];
        assert!(check_program(&parts).is_empty());
    }
}
