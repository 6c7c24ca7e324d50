//! `hexfab solve`: compile one puzzle file into a solution file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use hexfab_core::Solution;

/// Solve `input` and write the solution next to it (or to `output`).
/// Returns the path the solution was written to.
pub fn run(input: &Path, output: Option<&Path>, name: &str) -> anyhow::Result<PathBuf> {
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let puzzle = hexfab_codec::decode_puzzle(&data)
        .with_context(|| format!("decoding {}", input.display()))?;

    let solved = hexfab_solve::solve(&puzzle)
        .with_context(|| format!("solving puzzle {:?}", puzzle.name))?;

    let mut solution = Solution::new(puzzle_stem(input), name);
    solution.parts = solved.parts;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("solution"),
    };
    fs::write(&path, hexfab_codec::encode_solution(&solution))
        .with_context(|| format!("writing {}", path.display()))?;

    println!(
        "{}: {} parts, {} instructions, last delivery on cycle {} -> {}",
        puzzle.name,
        solved.report.parts,
        solved.report.instructions,
        solved.report.final_cycle,
        path.display()
    );
    Ok(path)
}

/// Solution files reference the puzzle by file name without extension.
pub fn puzzle_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
