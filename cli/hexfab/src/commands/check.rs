//! `hexfab check`: run conformance checks on a solution file.

use std::fs;
use std::path::Path;

use anyhow::Context;

use hexfab_verify::{check_program, is_clean, Severity};

/// Check `solution`, optionally confirming it targets `puzzle`.
pub fn run(solution: &Path, puzzle: Option<&Path>) -> anyhow::Result<()> {
    let data = fs::read(solution).with_context(|| format!("reading {}", solution.display()))?;
    let decoded = hexfab_codec::decode_solution(&data)
        .with_context(|| format!("decoding {}", solution.display()))?;

    if let Some(puzzle_path) = puzzle {
        let expected = super::solve::puzzle_stem(puzzle_path);
        if decoded.puzzle != expected {
            println!(
                "warning: solution targets puzzle {:?}, not {:?}",
                decoded.puzzle, expected
            );
        }
        // Decoding alone proves the puzzle file is readable.
        let puzzle_data =
            fs::read(puzzle_path).with_context(|| format!("reading {}", puzzle_path.display()))?;
        hexfab_codec::decode_puzzle(&puzzle_data)
            .with_context(|| format!("decoding {}", puzzle_path.display()))?;
    }

    let diagnostics = check_program(&decoded.parts);
    for diagnostic in &diagnostics {
        let tag = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{tag}: part {}: {}", diagnostic.part, diagnostic.message);
    }

    if !is_clean(&diagnostics) {
        anyhow::bail!(
            "{} failed conformance checks",
            solution.display()
        );
    }

    println!(
        "{}: {} parts, conformance clean",
        solution.display(),
        decoded.parts.len()
    );
    Ok(())
}
