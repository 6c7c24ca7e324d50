//! Exact integer transforms between untilted local coordinates and the
//! four station orientations.
//!
//! Every reagent's extraction machinery is one canonical layout drawn in
//! local `(x, y)` coordinates and rotated into place around the shared
//! center; products use a second, "centered" layout family that is pushed
//! outward by a fixed offset before rotating. Station indices 0..3 select
//! the orientation. All transforms are pure bijections on the grid:
//! station 0 is the identity, station 2 undoes station 1, and station 3
//! is station 2 applied twice.

use hexfab_core::Hex;

/// Number of distinct station orientations; also the cap on how many
/// reagents (or products) one program can serve.
pub const STATION_COUNT: usize = 4;

/// Rotate a local cell into station `station`'s orientation.
pub fn rotate(x: i32, y: i32, station: usize) -> Hex {
    match station {
        0 => Hex::new(x, y),
        1 => Hex::new(-y, x + y),
        2 => Hex::new(x + y, -x),
        3 => Hex::new(y, -x - y),
        _ => unreachable!("station index out of range"),
    }
}

/// Base arm/glyph rotation for parts serving station `station`.
pub fn arm_rotation(station: usize) -> i32 {
    match station {
        0 => 1,
        1 => 0,
        _ => station as i32,
    }
}

/// Cells covered by a straight rail along row `row`, local columns
/// `start..end`, in station `station`'s orientation. `reverse` flips the
/// traversal direction so the rail can be laid from either end.
pub fn rail_cells(start: i32, end: i32, station: usize, row: i32, reverse: bool) -> Vec<Hex> {
    let mut cells: Vec<Hex> = match station {
        0 => (start..end).map(|i| Hex::new(-i, row)).collect(),
        1 => (start - row..end - row).map(|i| Hex::new(-row, -i)).collect(),
        2 => (start..end).map(|i| Hex::new(-i + row, i)).collect(),
        3 => (start - row..end - row).map(|i| Hex::new(row, i)).collect(),
        _ => unreachable!("station index out of range"),
    };
    if reverse {
        cells.reverse();
    }
    cells
}

/// Rotate a local cell of the centered layout family, pushed outward by
/// `offset`, into station `station`'s orientation.
pub fn rotate_centered(x: i32, y: i32, offset: i32, station: usize) -> Hex {
    match station {
        0 => Hex::new(x, y),
        1 => Hex::new(offset - y, x + y - offset),
        2 => Hex::new(x + y, offset - x),
        3 => Hex::new(y + offset, offset - x - y),
        _ => unreachable!("station index out of range"),
    }
}

/// Base arm/glyph rotation for centered-family parts at station `station`.
pub fn arm_rotation_centered(station: usize) -> i32 {
    match station {
        2 => 5,
        3 => 4,
        _ => station as i32,
    }
}

/// Rail cells for the centered layout family: the untilted rail mirrored
/// through the origin, then rotated with [`rotate_centered`].
pub fn rail_cells_centered(
    start: i32,
    end: i32,
    station: usize,
    row: i32,
    reverse: bool,
    offset: i32,
) -> Vec<Hex> {
    rail_cells(-end, -start, 0, row, reverse)
        .into_iter()
        .map(|cell| rotate_centered(cell.u, cell.v, offset, station))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_zero_is_identity() {
        for (x, y) in [(0, 0), (3, -2), (-7, 5)] {
            assert_eq!(rotate(x, y, 0), Hex::new(x, y));
            assert_eq!(rotate_centered(x, y, 8, 0), Hex::new(x, y));
        }
    }

    #[test]
    fn station_two_inverts_station_one() {
        for (x, y) in [(1, 0), (4, -3), (-2, 6)] {
            let once = rotate(x, y, 1);
            assert_eq!(rotate(once.u, once.v, 2), Hex::new(x, y));
        }
    }

    #[test]
    fn station_three_is_station_two_twice() {
        for (x, y) in [(1, 1), (-5, 2), (0, -4)] {
            let twice = rotate(x, y, 2);
            let twice = rotate(twice.u, twice.v, 2);
            assert_eq!(rotate(x, y, 3), twice);
        }
    }

    #[test]
    fn six_steps_complete_a_full_turn() {
        // Station 1 is a single 60-degree step; six of them are a full turn.
        let mut cell = Hex::new(3, -1);
        for _ in 0..6 {
            cell = rotate(cell.u, cell.v, 1);
        }
        assert_eq!(cell, Hex::new(3, -1));
    }

    #[test]
    fn rail_covers_requested_span() {
        let cells = rail_cells(2, 5, 0, 1, false);
        assert_eq!(
            cells,
            vec![Hex::new(-2, 1), Hex::new(-3, 1), Hex::new(-4, 1)]
        );

        let reversed = rail_cells(2, 5, 0, 1, true);
        assert_eq!(
            reversed,
            vec![Hex::new(-4, 1), Hex::new(-3, 1), Hex::new(-2, 1)]
        );
    }

    #[test]
    fn empty_rail_span() {
        assert!(rail_cells(5, 5, 0, 0, false).is_empty());
        assert!(rail_cells(6, 5, 2, 0, true).is_empty());
    }

    #[test]
    fn tilted_rails() {
        // Station 1 rails run along constant u = -row.
        assert_eq!(
            rail_cells(2, 4, 1, 1, false),
            vec![Hex::new(-1, -1), Hex::new(-1, -2)]
        );
        // Station 3 rails run along constant u = row.
        assert_eq!(
            rail_cells(2, 4, 3, 2, false),
            vec![Hex::new(2, 0), Hex::new(2, 1)]
        );
    }

    #[test]
    fn arm_rotation_constants() {
        assert_eq!(arm_rotation(0), 1);
        assert_eq!(arm_rotation(1), 0);
        assert_eq!(arm_rotation(2), 2);
        assert_eq!(arm_rotation(3), 3);

        assert_eq!(arm_rotation_centered(0), 0);
        assert_eq!(arm_rotation_centered(1), 1);
        assert_eq!(arm_rotation_centered(2), 5);
        assert_eq!(arm_rotation_centered(3), 4);
    }

    #[test]
    fn centered_rail_matches_pointwise_transform() {
        let cells = rail_cells_centered(13, 16, 2, -1, true, 8);
        let base = rail_cells(-16, -13, 0, -1, true);
        let expected: Vec<Hex> = base
            .into_iter()
            .map(|c| rotate_centered(c.u, c.v, 8, 2))
            .collect();
        assert_eq!(cells, expected);
    }
}
