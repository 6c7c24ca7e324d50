//! Puzzle file codec (format version 3).
//!
//! Layout: version u32, name string, creator u64, parts-available u64,
//! reagent count u32 + molecules, product count u32 + molecules, output
//! scale u32, production flag u8. Molecule atoms are (element u8, u i8,
//! v i8); bonds are (kind u8, two i8 coordinate pairs).

use hexfab_core::{Atom, Bond, BondKind, Element, Hex, Molecule, PartsAvailable, Puzzle};

use crate::error::CodecError;
use crate::wire::{Reader, Writer};

/// Puzzle file format version.
pub const PUZZLE_VERSION: u32 = 3;

/// Decode a puzzle from file bytes.
pub fn decode_puzzle(data: &[u8]) -> Result<Puzzle, CodecError> {
    let mut r = Reader::new(data);

    let version = r.u32()?;
    if version != PUZZLE_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            expected: PUZZLE_VERSION,
        });
    }

    let name = r.string()?;
    let creator = r.u64()?;
    let parts_available = PartsAvailable::new(r.u64()?);

    let reagent_count = r.u32()?;
    let mut reagents = Vec::with_capacity(reagent_count as usize);
    for _ in 0..reagent_count {
        reagents.push(decode_molecule(&mut r)?);
    }

    let product_count = r.u32()?;
    let mut products = Vec::with_capacity(product_count as usize);
    for _ in 0..product_count {
        products.push(decode_molecule(&mut r)?);
    }

    let output_scale = r.u32()?;

    if r.u8()? != 0 {
        return Err(CodecError::ProductionPuzzle);
    }

    Ok(Puzzle {
        name,
        creator,
        parts_available,
        reagents,
        products,
        output_scale,
    })
}

/// Encode a puzzle to file bytes.
pub fn encode_puzzle(puzzle: &Puzzle) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::new();

    w.u32(PUZZLE_VERSION);
    w.string(&puzzle.name);
    w.u64(puzzle.creator);
    w.u64(puzzle.parts_available.bits());

    w.u32(puzzle.reagents.len() as u32);
    for molecule in &puzzle.reagents {
        encode_molecule(&mut w, molecule)?;
    }

    w.u32(puzzle.products.len() as u32);
    for molecule in &puzzle.products {
        encode_molecule(&mut w, molecule)?;
    }

    w.u32(puzzle.output_scale);
    w.u8(0); // no production data

    Ok(w.into_bytes())
}

fn decode_molecule(r: &mut Reader<'_>) -> Result<Molecule, CodecError> {
    let atom_count = r.u32()?;
    let mut atoms = Vec::with_capacity(atom_count as usize);
    for _ in 0..atom_count {
        let byte = r.u8()?;
        let element = Element::from_byte(byte).ok_or(CodecError::InvalidElement(byte))?;
        let u = r.i8()? as i32;
        let v = r.i8()? as i32;
        atoms.push(Atom::new(element, Hex::new(u, v)));
    }

    let bond_count = r.u32()?;
    let mut bonds = Vec::with_capacity(bond_count as usize);
    for _ in 0..bond_count {
        let kind = BondKind::new(r.u8()?);
        let a = Hex::new(r.i8()? as i32, r.i8()? as i32);
        let b = Hex::new(r.i8()? as i32, r.i8()? as i32);
        bonds.push(Bond::new(kind, a, b));
    }

    Ok(Molecule::from_parts(atoms, bonds))
}

fn encode_molecule(w: &mut Writer, molecule: &Molecule) -> Result<(), CodecError> {
    w.u32(molecule.atoms.len() as u32);
    for atom in &molecule.atoms {
        w.u8(atom.element.to_byte());
        w.i8(narrow(atom.position.u)?);
        w.i8(narrow(atom.position.v)?);
    }

    w.u32(molecule.bonds.len() as u32);
    for bond in &molecule.bonds {
        w.u8(bond.kind.bits());
        w.i8(narrow(bond.a.u)?);
        w.i8(narrow(bond.a.v)?);
        w.i8(narrow(bond.b.u)?);
        w.i8(narrow(bond.b.v)?);
    }

    Ok(())
}

/// Molecule coordinates are stored as signed bytes.
fn narrow(value: i32) -> Result<i8, CodecError> {
    i8::try_from(value).map_err(|_| CodecError::CoordinateOverflow(value))
}
