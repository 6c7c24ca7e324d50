//! `hexfab inspect`: print layout analysis of a puzzle.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use hexfab_solve::{Footprint, ProductLayout, ReagentLayout};

#[derive(Serialize)]
struct StructureView {
    atoms: usize,
    bonds: usize,
    width: i32,
    height: i32,
    decomposition_time: i64,
}

#[derive(Serialize)]
struct PuzzleView {
    name: String,
    reagents: Vec<StructureView>,
    products: Vec<StructureView>,
}

impl StructureView {
    fn new(footprint: &Footprint, atoms: usize, bonds: usize) -> Self {
        Self {
            atoms,
            bonds,
            width: footprint.width,
            height: footprint.height,
            decomposition_time: footprint.decomposition_time(),
        }
    }
}

/// Inspect `input`; `json` switches to machine-readable output.
pub fn run(input: &Path, json: bool) -> anyhow::Result<()> {
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let puzzle = hexfab_codec::decode_puzzle(&data)
        .with_context(|| format!("decoding {}", input.display()))?;

    let view = PuzzleView {
        name: puzzle.name.clone(),
        reagents: puzzle
            .reagents
            .iter()
            .map(|m| {
                let layout = ReagentLayout::analyze(m);
                StructureView::new(&layout.footprint, m.atoms.len(), m.bonds.len())
            })
            .collect(),
        products: puzzle
            .products
            .iter()
            .map(|m| {
                let layout = ProductLayout::analyze(m);
                StructureView::new(&layout.footprint, m.atoms.len(), m.bonds.len())
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("puzzle: {}", view.name);
    for (index, reagent) in view.reagents.iter().enumerate() {
        println!(
            "  reagent {index}: {} atoms, {} bonds, {}x{}, decomposition time {}",
            reagent.atoms, reagent.bonds, reagent.width, reagent.height,
            reagent.decomposition_time
        );
    }
    for (index, product) in view.products.iter().enumerate() {
        println!(
            "  product {index}: {} atoms, {} bonds, {}x{}",
            product.atoms, product.bonds, product.width, product.height
        );
    }
    Ok(())
}
