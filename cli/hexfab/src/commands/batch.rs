//! `hexfab batch`: solve every puzzle file in a directory.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Solve all `.puzzle` files under `dir`, writing solutions next to them.
/// Individual failures are reported and counted, not fatal.
pub fn run(dir: &Path, name: &str) -> anyhow::Result<()> {
    let mut puzzles: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "puzzle"))
        .collect();
    puzzles.sort();

    if puzzles.is_empty() {
        anyhow::bail!("no .puzzle files in {}", dir.display());
    }

    let mut solved = 0;
    for path in &puzzles {
        match super::solve::run(path, None, name) {
            Ok(_) => solved += 1,
            Err(err) => println!("{}: {err:#}", path.display()),
        }
    }

    println!("solved {solved}/{} puzzles", puzzles.len());
    Ok(())
}
