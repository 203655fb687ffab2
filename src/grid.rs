//! Geometry of the 5x5 board.
//!
//! Cells are numbered row-major, 0 at the top-left. The 40 internal
//! boundaries are numbered vertical-first:
//! - `0..20`: vertical boundaries, `row * 4 + col`, joining `(row, col)` to
//!   `(row, col + 1)`
//! - `20..40`: horizontal boundaries, `20 + row * 5 + col`, joining
//!   `(row, col)` to `(row + 1, col)`
//!
//! A boundary's connector is seen as-is by its first (left/upper) cell and
//! negated by its second cell.
//!
//! Border pieces are labelled in a frame that walks the border clockwise:
//! `Left` faces the previous border piece, `Right` the next one, an edge
//! piece's `Bottom` faces the center and its `Top` is flat. A corner's flat
//! sides are `Top` and `Bottom`. Center pieces use the board's own frame.

use crate::pieces::{Direction, PieceKind};

/// Cells per row and column.
pub const GRID_DIM: usize = 5;

/// Total cells (and pieces).
pub const NUM_CELLS: usize = GRID_DIM * GRID_DIM;

/// Internal boundaries between adjacent cells.
pub const NUM_BOUNDARIES: usize = 2 * GRID_DIM * (GRID_DIM - 1);

/// Vertical boundaries come first in the boundary numbering.
pub const NUM_VERTICAL: usize = NUM_BOUNDARIES / 2;

/// Corner cells clockwise from the top-left.
pub const CORNER_CELLS: [usize; 4] = [0, 4, 24, 20];

/// Edge cells grouped by strip: top, right, bottom, left.
///
/// Within a strip cells run left-to-right or top-to-bottom.
pub const EDGE_CELLS: [usize; 12] = [1, 2, 3, 9, 14, 19, 21, 22, 23, 5, 10, 15];

/// Center cells, row-major.
pub const CENTER_CELLS: [usize; 9] = [6, 7, 8, 11, 12, 13, 16, 17, 18];

/// Converts (row, col) to a cell index.
#[inline(always)]
pub const fn coord_to_idx(row: usize, col: usize) -> usize {
    row * GRID_DIM + col
}

/// Converts a cell index to (row, col).
#[inline(always)]
pub const fn idx_to_coord(cell: usize) -> (usize, usize) {
    (cell / GRID_DIM, cell % GRID_DIM)
}

/// Returns the piece role for a cell.
pub const fn kind_of(cell: usize) -> PieceKind {
    let (row, col) = idx_to_coord(cell);
    let row_border = row == 0 || row == GRID_DIM - 1;
    let col_border = col == 0 || col == GRID_DIM - 1;
    match (row_border, col_border) {
        (true, true) => PieceKind::Corner,
        (false, false) => PieceKind::Center,
        _ => PieceKind::Edge,
    }
}

/// One internal boundary and the two cells it joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Boundary {
    /// Left or upper cell.
    pub first: usize,
    /// Right or lower cell.
    pub second: usize,
    /// Board direction from `first` toward `second` (`Right` or `Bottom`).
    pub heading: Direction,
}

const fn build_boundaries() -> [Boundary; NUM_BOUNDARIES] {
    let mut table = [Boundary {
        first: 0,
        second: 0,
        heading: Direction::Right,
    }; NUM_BOUNDARIES];

    let mut row = 0;
    while row < GRID_DIM {
        let mut col = 0;
        while col < GRID_DIM - 1 {
            let cell = coord_to_idx(row, col);
            table[row * (GRID_DIM - 1) + col] = Boundary {
                first: cell,
                second: cell + 1,
                heading: Direction::Right,
            };
            col += 1;
        }
        row += 1;
    }

    let mut row = 0;
    while row < GRID_DIM - 1 {
        let mut col = 0;
        while col < GRID_DIM {
            let cell = coord_to_idx(row, col);
            table[NUM_VERTICAL + cell] = Boundary {
                first: cell,
                second: cell + GRID_DIM,
                heading: Direction::Bottom,
            };
            col += 1;
        }
        row += 1;
    }

    table
}

/// All boundaries, indexed by boundary number.
pub const BOUNDARIES: [Boundary; NUM_BOUNDARIES] = build_boundaries();

/// Returns the boundary number on the given board side of a cell, if any.
pub const fn boundary_toward(cell: usize, heading: Direction) -> Option<usize> {
    let (row, col) = idx_to_coord(cell);
    match heading {
        Direction::Right if col < GRID_DIM - 1 => Some(row * (GRID_DIM - 1) + col),
        Direction::Left if col > 0 => Some(row * (GRID_DIM - 1) + col - 1),
        Direction::Bottom if row < GRID_DIM - 1 => Some(NUM_VERTICAL + cell),
        Direction::Top if row > 0 => Some(NUM_VERTICAL + cell - GRID_DIM),
        _ => None,
    }
}

/// Builds, per cell, the piece-frame side facing each board direction.
///
/// Edge strips are quarter-turn rotations of the board frame (top 0, right 3,
/// bottom 2, left 1 in `Direction::rotated` terms). Corners only distinguish
/// the previous and next border neighbour.
const fn build_frames() -> [[Direction; 4]; NUM_CELLS] {
    use Direction::{Bottom, Left, Right, Top};

    let mut table = [[Top, Right, Bottom, Left]; NUM_CELLS];
    let mut cell = 0;
    while cell < NUM_CELLS {
        let (row, col) = idx_to_coord(cell);
        let turns = if row == 0 {
            0
        } else if col == GRID_DIM - 1 {
            3
        } else if row == GRID_DIM - 1 {
            2
        } else if col == 0 {
            1
        } else {
            0
        };
        let mut heading = 0;
        while heading < 4 {
            table[cell][heading] = Direction::from_index(heading).rotated(turns);
            heading += 1;
        }
        cell += 1;
    }

    // [facing Top, facing Right, facing Bottom, facing Left]
    table[CORNER_CELLS[0]] = [Top, Right, Left, Bottom];
    table[CORNER_CELLS[1]] = [Bottom, Top, Right, Left];
    table[CORNER_CELLS[2]] = [Left, Bottom, Top, Right];
    table[CORNER_CELLS[3]] = [Right, Left, Bottom, Top];

    table
}

const FRAMES: [[Direction; 4]; NUM_CELLS] = build_frames();

/// Returns the side label, in the frame of a piece placed on `cell`, that
/// faces board direction `heading`.
#[inline(always)]
pub const fn frame_side(cell: usize, heading: Direction) -> Direction {
    FRAMES[cell][heading.index()]
}

/// Facing sides of two originally adjacent pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SidePair {
    /// Side of the lower-indexed piece.
    pub low: Direction,
    /// Side of the higher-indexed piece.
    pub high: Direction,
}

const fn build_canonical_adjacency() -> [[Option<SidePair>; NUM_CELLS]; NUM_CELLS] {
    let mut table = [[None; NUM_CELLS]; NUM_CELLS];
    let mut b = 0;
    while b < NUM_BOUNDARIES {
        let boundary = BOUNDARIES[b];
        table[boundary.first][boundary.second] = Some(SidePair {
            low: frame_side(boundary.first, boundary.heading),
            high: frame_side(boundary.second, boundary.heading.opposite()),
        });
        b += 1;
    }
    table
}

/// `[low][high]` is the side pairing of pieces `low < high` when they are
/// neighbours in the original layout.
pub const CANONICAL_ADJACENCY: [[Option<SidePair>; NUM_CELLS]; NUM_CELLS] =
    build_canonical_adjacency();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_join_adjacent_cells() {
        for (number, boundary) in BOUNDARIES.iter().enumerate() {
            let (r1, c1) = idx_to_coord(boundary.first);
            let (r2, c2) = idx_to_coord(boundary.second);
            assert_eq!(
                r1.abs_diff(r2) + c1.abs_diff(c2),
                1,
                "Boundary {number} joins non-adjacent cells"
            );
            assert!(boundary.first < boundary.second);
        }
    }

    #[test]
    fn test_boundaries_are_unique() {
        let mut seen = [[false; NUM_CELLS]; NUM_CELLS];
        for boundary in BOUNDARIES {
            assert!(!seen[boundary.first][boundary.second]);
            seen[boundary.first][boundary.second] = true;
        }
    }

    #[test]
    fn test_boundary_toward_matches_table() {
        for (number, boundary) in BOUNDARIES.iter().enumerate() {
            assert_eq!(boundary_toward(boundary.first, boundary.heading), Some(number));
            assert_eq!(
                boundary_toward(boundary.second, boundary.heading.opposite()),
                Some(number)
            );
        }
        assert_eq!(boundary_toward(0, Direction::Top), None);
        assert_eq!(boundary_toward(24, Direction::Right), None);
    }

    #[test]
    fn test_frames_are_permutations() {
        for cell in 0..NUM_CELLS {
            let mut seen = [false; 4];
            for heading in Direction::ALL {
                let side = frame_side(cell, heading);
                assert!(!seen[side.index()], "Cell {cell} maps two headings to {side:?}");
                seen[side.index()] = true;
            }
        }
    }

    #[test]
    fn test_border_frames_keep_outward_sides_flat() {
        for cell in 0..NUM_CELLS {
            let kind = kind_of(cell);
            for heading in Direction::ALL {
                let outward = boundary_toward(cell, heading).is_none();
                let side = frame_side(cell, heading);
                match kind {
                    PieceKind::Center => assert!(!outward),
                    PieceKind::Edge => assert_eq!(outward, side == Direction::Top),
                    PieceKind::Corner => assert_eq!(
                        outward,
                        side == Direction::Top || side == Direction::Bottom
                    ),
                }
            }
        }
    }

    #[test]
    fn test_cell_lists_match_roles() {
        for cell in CORNER_CELLS {
            assert_eq!(kind_of(cell), PieceKind::Corner);
        }
        for cell in EDGE_CELLS {
            assert_eq!(kind_of(cell), PieceKind::Edge);
        }
        for cell in CENTER_CELLS {
            assert_eq!(kind_of(cell), PieceKind::Center);
        }
    }

    #[test]
    fn test_canonical_adjacency_has_one_entry_per_boundary() {
        let count = CANONICAL_ADJACENCY
            .iter()
            .flatten()
            .filter(|pair| pair.is_some())
            .count();
        assert_eq!(count, NUM_BOUNDARIES);
        assert_eq!(
            CANONICAL_ADJACENCY[0][1],
            Some(SidePair {
                low: Direction::Right,
                high: Direction::Left
            })
        );
        assert_eq!(
            CANONICAL_ADJACENCY[0][5],
            Some(SidePair {
                low: Direction::Left,
                high: Direction::Right
            })
        );
    }

    #[test]
    fn test_coordinate_conversion_roundtrip() {
        for idx in 0..NUM_CELLS {
            let (row, col) = idx_to_coord(idx);
            assert_eq!(coord_to_idx(row, col), idx, "Roundtrip failed for index {idx}");
        }
    }
}
