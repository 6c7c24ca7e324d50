//! Molecules: typed atoms connected by bonds, as read from a puzzle.

use serde::{Deserialize, Serialize};

use crate::coord::Hex;
use crate::element::Element;

/// Bond flavor bitmask as stored in puzzle files.
///
/// A plain structural bond is the `NORMAL` bit alone; the three triplex
/// bits may be combined with each other. The solver only ever accepts
/// `NORMAL` bonds on products, but the model (and the codec) carries
/// whatever the file says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondKind {
    bits: u8,
}

impl BondKind {
    pub const NORMAL: u8 = 0x01;
    pub const TRIPLEX_RED: u8 = 0x02;
    pub const TRIPLEX_BLACK: u8 = 0x04;
    pub const TRIPLEX_YELLOW: u8 = 0x08;

    pub fn new(bits: u8) -> Self {
        Self { bits }
    }

    /// The ordinary single bond.
    pub fn normal() -> Self {
        Self { bits: Self::NORMAL }
    }

    /// True when this is exactly the ordinary single bond.
    pub fn is_normal(&self) -> bool {
        self.bits == Self::NORMAL
    }

    pub fn has(&self, flag: u8) -> bool {
        self.bits & flag != 0
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }
}

/// A single typed atom at a grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub element: Element,
    pub position: Hex,
}

impl Atom {
    pub fn new(element: Element, position: Hex) -> Self {
        Self { element, position }
    }
}

/// A bond between two atom positions of the same molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub kind: BondKind,
    pub a: Hex,
    pub b: Hex,
}

impl Bond {
    pub fn new(kind: BondKind, a: Hex, b: Hex) -> Self {
        Self { kind, a, b }
    }

    /// An ordinary single bond between two positions.
    pub fn normal(a: Hex, b: Hex) -> Self {
        Self::new(BondKind::normal(), a, b)
    }
}

/// A reagent or product structure: atoms plus the bonds connecting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Self { atoms, bonds }
    }

    /// Elements present in this molecule, in atom order (with repeats).
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.atoms.iter().map(|a| a.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_kind_flags() {
        let normal = BondKind::normal();
        assert!(normal.is_normal());
        assert!(normal.has(BondKind::NORMAL));
        assert!(!normal.has(BondKind::TRIPLEX_RED));

        let triplex = BondKind::new(BondKind::TRIPLEX_RED | BondKind::TRIPLEX_BLACK);
        assert!(!triplex.is_normal());
        assert!(triplex.has(BondKind::TRIPLEX_BLACK));
    }

    #[test]
    fn normal_plus_triplex_is_not_normal() {
        let mixed = BondKind::new(BondKind::NORMAL | BondKind::TRIPLEX_YELLOW);
        assert!(mixed.has(BondKind::NORMAL));
        assert!(!mixed.is_normal());
    }

    #[test]
    fn molecule_elements() {
        let m = Molecule::from_parts(
            vec![
                Atom::new(Element::Water, Hex::new(0, 0)),
                Atom::new(Element::Fire, Hex::new(1, 0)),
            ],
            vec![Bond::normal(Hex::new(0, 0), Hex::new(1, 0))],
        );
        let elements: Vec<_> = m.elements().collect();
        assert_eq!(elements, vec![Element::Water, Element::Fire]);
    }
}
