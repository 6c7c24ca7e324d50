//! Solution file codec (format version 7, part record version 1).
//!
//! Layout: version u32, puzzle name string, solution name string, metric
//! count u32 (0 or 4, with fixed numbering 0..3 for cycles/cost/area/
//! instructions), part count u32, then one record per part. Part record:
//! name string, version u8 = 1, position 2 x i32, length u32, rotation
//! i32, reagent/product index u32, instruction count u32 + (index i32,
//! opcode u8) pairs, track cell list for track parts, arm number u32, and
//! conduit id + cell list for conduit parts.

use hexfab_core::{Hex, Instruction, Opcode, Part, PartKind, Solution, SolutionMetrics};

use crate::error::CodecError;
use crate::wire::{Reader, Writer};

/// Solution file format version.
pub const SOLUTION_VERSION: u32 = 7;

/// Part record version.
pub const PART_VERSION: u8 = 1;

/// Decode a solution from file bytes.
pub fn decode_solution(data: &[u8]) -> Result<Solution, CodecError> {
    let mut r = Reader::new(data);

    let version = r.u32()?;
    if version != SOLUTION_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            expected: SOLUTION_VERSION,
        });
    }

    let puzzle = r.string()?;
    let name = r.string()?;

    let metric_count = r.u32()?;
    let metrics = match metric_count {
        0 => None,
        4 => {
            let mut values = [0u32; 4];
            for (number, value) in values.iter_mut().enumerate() {
                if r.u32()? != number as u32 {
                    return Err(CodecError::BadMetricNumbering);
                }
                *value = r.u32()?;
            }
            Some(SolutionMetrics {
                cycles: values[0],
                cost: values[1],
                area: values[2],
                instructions: values[3],
            })
        }
        other => return Err(CodecError::BadMetricCount(other)),
    };

    let part_count = r.u32()?;
    let mut parts = Vec::with_capacity(part_count as usize);
    for _ in 0..part_count {
        parts.push(decode_part(&mut r)?);
    }

    Ok(Solution {
        puzzle,
        name,
        metrics,
        parts,
    })
}

/// Encode a solution to file bytes.
pub fn encode_solution(solution: &Solution) -> Vec<u8> {
    let mut w = Writer::new();

    w.u32(SOLUTION_VERSION);
    w.string(&solution.puzzle);
    w.string(&solution.name);

    match solution.metrics {
        Some(m) => {
            w.u32(4);
            for (number, value) in [m.cycles, m.cost, m.area, m.instructions]
                .into_iter()
                .enumerate()
            {
                w.u32(number as u32);
                w.u32(value);
            }
        }
        None => w.u32(0),
    }

    w.u32(solution.parts.len() as u32);
    for part in &solution.parts {
        encode_part(&mut w, part);
    }

    w.into_bytes()
}

fn decode_part(r: &mut Reader<'_>) -> Result<Part, CodecError> {
    let name = r.string()?;
    let kind = PartKind::from_wire_name(&name).ok_or(CodecError::UnknownPartName(name))?;

    let version = r.u8()?;
    if version != PART_VERSION {
        return Err(CodecError::UnsupportedPartVersion(version));
    }

    let position = Hex::new(r.i32()?, r.i32()?);
    let length = r.u32()?;
    let rotation = r.i32()?;
    let io_index = r.u32()?;

    let instruction_count = r.u32()?;
    let mut instructions = Vec::with_capacity(instruction_count as usize);
    for _ in 0..instruction_count {
        let index = r.i32()?;
        let byte = r.u8()?;
        let op = Opcode::from_byte(byte).ok_or(CodecError::InvalidOpcode(byte))?;
        instructions.push(Instruction::new(index, op));
    }

    let mut track_hexes = Vec::new();
    if kind == PartKind::Track {
        let cell_count = r.u32()?;
        for _ in 0..cell_count {
            track_hexes.push(Hex::new(r.i32()?, r.i32()?));
        }
    }

    let arm_number = r.u32()?;

    let mut conduit_id = 0;
    let mut conduit_hexes = Vec::new();
    if kind == PartKind::Conduit {
        conduit_id = r.u32()?;
        let cell_count = r.u32()?;
        for _ in 0..cell_count {
            conduit_hexes.push(Hex::new(r.i32()?, r.i32()?));
        }
    }

    Ok(Part {
        kind,
        position,
        length,
        rotation,
        io_index,
        instructions,
        track_hexes,
        arm_number,
        conduit_id,
        conduit_hexes,
    })
}

fn encode_part(w: &mut Writer, part: &Part) {
    w.string(part.kind.wire_name());
    w.u8(PART_VERSION);
    w.i32(part.position.u);
    w.i32(part.position.v);
    w.u32(part.length);
    w.i32(part.rotation);
    w.u32(part.io_index);

    w.u32(part.instructions.len() as u32);
    for instruction in &part.instructions {
        w.i32(instruction.index);
        w.u8(instruction.op.to_byte());
    }

    if part.kind == PartKind::Track {
        w.u32(part.track_hexes.len() as u32);
        for cell in &part.track_hexes {
            w.i32(cell.u);
            w.i32(cell.v);
        }
    }

    w.u32(part.arm_number);

    if part.kind == PartKind::Conduit {
        w.u32(part.conduit_id);
        w.u32(part.conduit_hexes.len() as u32);
        for cell in &part.conduit_hexes {
            w.i32(cell.u);
            w.i32(cell.v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_solution() -> Solution {
        let mut arm = Part::arm(PartKind::Piston, Hex::new(-3, 1), 2, 3);
        arm.instructions.push(Instruction::new(0, Opcode::Grab));
        arm.instructions.push(Instruction::new(1, Opcode::TrackPlus));
        arm.instructions.push(Instruction::new(5, Opcode::Drop));

        let mut solution = Solution::new("sample", "hexfab");
        solution.parts.push(Part::io(PartKind::Input, Hex::new(-10, 3), 1, 0));
        solution
            .parts
            .push(Part::track(vec![Hex::new(0, 1), Hex::new(-1, 1)]));
        solution.parts.push(arm);
        solution
            .parts
            .push(Part::glyph(PartKind::Bonder, Hex::new(-9, 2), 1));
        solution
    }

    #[test]
    fn round_trip() {
        let solution = sample_solution();
        let bytes = encode_solution(&solution);
        let decoded = decode_solution(&bytes).unwrap();
        assert_eq!(decoded, solution);
    }

    #[test]
    fn round_trip_with_metrics() {
        let mut solution = sample_solution();
        solution.metrics = Some(SolutionMetrics {
            cycles: 120,
            cost: 300,
            area: 64,
            instructions: 48,
        });
        let bytes = encode_solution(&solution);
        let decoded = decode_solution(&bytes).unwrap();
        assert_eq!(decoded.metrics, solution.metrics);
    }

    #[test]
    fn wrong_version_rejected() {
        let mut bytes = encode_solution(&sample_solution());
        bytes[0] = 6;
        let err = decode_solution(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedVersion {
                found: 6,
                expected: SOLUTION_VERSION
            }
        ));
    }

    #[test]
    fn truncated_file_rejected() {
        let bytes = encode_solution(&sample_solution());
        let err = decode_solution(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEof { .. }));
    }

    #[test]
    fn unknown_part_name_rejected() {
        let mut w = Writer::new();
        w.u32(SOLUTION_VERSION);
        w.string("sample");
        w.string("bad");
        w.u32(0); // no metrics
        w.u32(1); // one part
        w.string("glyph-mystery");
        let err = decode_solution(&w.into_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::UnknownPartName(name) if name == "glyph-mystery"));
    }

    #[test]
    fn bad_metric_count_rejected() {
        let mut w = Writer::new();
        w.u32(SOLUTION_VERSION);
        w.string("sample");
        w.string("bad");
        w.u32(3);
        let err = decode_solution(&w.into_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::BadMetricCount(3)));
    }
}
