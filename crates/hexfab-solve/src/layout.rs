//! Bounding metrics and canonical dispensing order per molecule.
//!
//! Local coordinates put a molecule's bounding box at the origin with `x`
//! growing along the extraction track and `y` selecting the dispensing
//! row. Reagent atoms are ranked by the raster key that matches the
//! extraction machinery's snake through the bounding box; product atoms by
//! a plain row-major key, top row first.

use serde::Serialize;

use hexfab_core::{Element, Hex, Molecule};

/// Bounding-box metrics of a molecule. Every later stage works in the
/// local coordinates these offsets define.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Footprint {
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl Footprint {
    /// Measure a molecule. The caller guarantees at least one atom (the
    /// feasibility gate rejects empty molecules before any layout work).
    pub fn of(molecule: &Molecule) -> Footprint {
        let mut min_u = i32::MAX;
        let mut max_u = i32::MIN;
        let mut min_v = i32::MAX;
        let mut max_v = i32::MIN;
        for atom in &molecule.atoms {
            min_u = min_u.min(atom.position.u);
            max_u = max_u.max(atom.position.u);
            min_v = min_v.min(atom.position.v);
            max_v = max_v.max(atom.position.v);
        }
        Footprint {
            width: max_u - min_u + 1,
            height: max_v - min_v + 1,
            x_offset: max_u,
            y_offset: -min_v,
        }
    }

    /// Cycles for one full dispensing pass through a structure this size.
    pub fn decomposition_time(&self) -> i64 {
        let w = self.width as i64;
        let h = self.height as i64;
        2 * w + 2 * w * h + 8 * h
    }

    /// Local grid coordinates of a grid position within this footprint.
    pub fn local(&self, position: Hex) -> (i32, i32) {
        (-position.u + self.x_offset, position.v + self.y_offset)
    }
}

/// A reagent atom annotated with its dispensing rank.
#[derive(Debug, Clone, Serialize)]
pub struct RankedAtom {
    pub element: Element,
    /// Local coordinates within the reagent's footprint.
    pub x: i32,
    pub y: i32,
    /// Raster key: the cycle on which one pass of the extraction machinery
    /// first has this atom available.
    pub key: i64,
    /// Rank in dispensing order (position after sorting by key).
    pub order: usize,
}

/// Per-reagent layout: footprint plus atoms in extraction raster order.
#[derive(Debug, Clone, Serialize)]
pub struct ReagentLayout {
    pub footprint: Footprint,
    pub atoms: Vec<RankedAtom>,
}

impl ReagentLayout {
    pub fn analyze(molecule: &Molecule) -> ReagentLayout {
        let footprint = Footprint::of(molecule);
        let w = footprint.width as i64;
        let mut atoms: Vec<RankedAtom> = molecule
            .atoms
            .iter()
            .map(|atom| {
                let (x, y) = footprint.local(atom.position);
                let key = 2 * w + 2 * w * y as i64 + 8 * y as i64 + 2 * x as i64 + 10;
                RankedAtom {
                    element: atom.element,
                    x,
                    y,
                    key,
                    order: 0,
                }
            })
            .collect();
        atoms.sort_by_key(|a| a.key);
        for (order, atom) in atoms.iter_mut().enumerate() {
            atom.order = order;
        }
        ReagentLayout { footprint, atoms }
    }
}

/// A product atom in assembly raster order.
#[derive(Debug, Clone, Serialize)]
pub struct ProductAtom {
    pub element: Element,
    /// Local coordinates within the product's footprint.
    pub x: i32,
    pub y: i32,
}

/// Per-product layout: footprint plus atoms ordered top row first, each
/// row walked in increasing local `x`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductLayout {
    pub footprint: Footprint,
    pub atoms: Vec<ProductAtom>,
}

impl ProductLayout {
    pub fn analyze(molecule: &Molecule) -> ProductLayout {
        let footprint = Footprint::of(molecule);
        let mut ranked: Vec<&hexfab_core::Atom> = molecule.atoms.iter().collect();
        ranked.sort_by_key(|a| -10 * a.position.v as i64 - a.position.u as i64);
        let atoms = ranked
            .into_iter()
            .map(|atom| {
                let (x, y) = footprint.local(atom.position);
                ProductAtom {
                    element: atom.element,
                    x,
                    y,
                }
            })
            .collect();
        ProductLayout { footprint, atoms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfab_core::Atom;

    fn molecule(atoms: &[(Element, i32, i32)]) -> Molecule {
        Molecule::from_parts(
            atoms
                .iter()
                .map(|&(e, u, v)| Atom::new(e, Hex::new(u, v)))
                .collect(),
            vec![],
        )
    }

    #[test]
    fn footprint_of_pair() {
        let m = molecule(&[(Element::Water, 0, 0), (Element::Water, 1, 0)]);
        let fp = Footprint::of(&m);
        assert_eq!(fp.width, 2);
        assert_eq!(fp.height, 1);
        assert_eq!(fp.x_offset, 1);
        assert_eq!(fp.y_offset, 0);
        assert_eq!(fp.decomposition_time(), 16);
    }

    #[test]
    fn footprint_with_negative_extent() {
        let m = molecule(&[(Element::Salt, -1, -2), (Element::Salt, 2, 1)]);
        let fp = Footprint::of(&m);
        assert_eq!(fp.width, 4);
        assert_eq!(fp.height, 4);
        assert_eq!(fp.x_offset, 2);
        assert_eq!(fp.y_offset, 2);
    }

    #[test]
    fn local_coordinates_flip_x() {
        let m = molecule(&[(Element::Salt, 0, 0), (Element::Salt, 1, 0)]);
        let fp = Footprint::of(&m);
        // Rightmost grid atom sits at local x = 0, leftmost at width - 1.
        assert_eq!(fp.local(Hex::new(1, 0)), (0, 0));
        assert_eq!(fp.local(Hex::new(0, 0)), (1, 0));
    }

    #[test]
    fn reagent_ranking_follows_raster_key() {
        let m = molecule(&[
            (Element::Water, 0, 0),
            (Element::Water, 1, 0),
            (Element::Fire, 0, 1),
            (Element::Fire, 1, 1),
        ]);
        let layout = ReagentLayout::analyze(&m);
        // Bottom row dispenses before the top row, and within a row the
        // rightmost grid atom (smallest local x) dispenses first.
        let coords: Vec<(i32, i32)> = layout.atoms.iter().map(|a| (a.x, a.y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        let orders: Vec<usize> = layout.atoms.iter().map(|a| a.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        // Keys are strictly increasing across the raster.
        assert!(layout.atoms.windows(2).all(|w| w[0].key < w[1].key));
    }

    #[test]
    fn product_ranking_is_row_major_top_first() {
        let m = molecule(&[
            (Element::Salt, 0, 0),
            (Element::Salt, 1, 0),
            (Element::Salt, 0, 1),
            (Element::Salt, 1, 1),
        ]);
        let layout = ProductLayout::analyze(&m);
        let coords: Vec<(i32, i32)> = layout.atoms.iter().map(|a| (a.x, a.y)).collect();
        // Top row (local y = 1) first; within a row local x ascends.
        assert_eq!(coords, vec![(0, 1), (1, 1), (0, 0), (1, 0)]);
    }
}
