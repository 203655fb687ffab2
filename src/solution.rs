//! Full 25-slot solutions and their comparison with the original layout.

use crate::border::EdgeSolution;
use crate::center::CenterSolution;
use crate::grid::{
    coord_to_idx, frame_side, SidePair, BOUNDARIES, CANONICAL_ADJACENCY, CORNER_CELLS, GRID_DIM,
    NUM_BOUNDARIES, NUM_CELLS,
};

/// A complete placement: which piece sits on each cell and how it is turned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PuzzleSolution {
    /// Piece index per cell, row-major.
    pub indexes: [u8; NUM_CELLS],
    /// Quarter turns per cell; always 0 outside the center block.
    pub rotations: [u8; NUM_CELLS],
}

impl PuzzleSolution {
    /// Every piece on its own cell, unrotated.
    pub fn identity() -> Self {
        Self {
            indexes: std::array::from_fn(|cell| cell as u8),
            rotations: [0; NUM_CELLS],
        }
    }

    /// Places a border and a center block on the board.
    pub fn merge(edges: &EdgeSolution, centers: &CenterSolution) -> Self {
        let mut indexes = [0; NUM_CELLS];
        let mut rotations = [0; NUM_CELLS];

        for (&cell, &piece) in CORNER_CELLS.iter().zip(&edges.corners) {
            indexes[cell] = piece;
        }
        for i in 0..3 {
            indexes[coord_to_idx(0, i + 1)] = edges.top[i];
            indexes[coord_to_idx(GRID_DIM - 1, i + 1)] = edges.bottom[i];
            indexes[coord_to_idx(i + 1, 0)] = edges.left[i];
            indexes[coord_to_idx(i + 1, GRID_DIM - 1)] = edges.right[i];
        }
        for row in 0..3 {
            for col in 0..3 {
                let cell = coord_to_idx(row + 1, col + 1);
                indexes[cell] = centers.indexes[row][col];
                rotations[cell] = centers.rotations[row][col];
            }
        }

        Self { indexes, rotations }
    }
}

/// How much of the original layout a solution reproduces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Similarity {
    /// Original neighbour pairs that are neighbours again.
    pub index_matches: u32,
    /// Of those, pairs that also meet on the same two sides.
    pub side_matches: u32,
}

impl Similarity {
    /// True for the original layout itself.
    pub fn is_canonical(&self) -> bool {
        self.index_matches == NUM_BOUNDARIES as u32
    }

    /// Original neighbour pairs that are broken up.
    pub fn index_distance(&self) -> u32 {
        NUM_BOUNDARIES as u32 - self.index_matches
    }

    /// Original neighbour pairs that are broken up or meet on other sides.
    pub fn side_distance(&self) -> u32 {
        NUM_BOUNDARIES as u32 - self.side_matches
    }
}

/// Compares a solution against the original layout.
///
/// For every boundary of the solution, the two pieces are looked up among
/// the original neighbour pairs. The side each piece shows across the
/// boundary is its own label for that cell and heading, advanced by the
/// piece's rotation.
pub fn score_against_canonical(solution: &PuzzleSolution) -> Similarity {
    let mut similarity = Similarity::default();

    for boundary in BOUNDARIES {
        let first = solution.indexes[boundary.first];
        let second = solution.indexes[boundary.second];
        let first_side = frame_side(boundary.first, boundary.heading)
            .rotated(solution.rotations[boundary.first]);
        let second_side = frame_side(boundary.second, boundary.heading.opposite())
            .rotated(solution.rotations[boundary.second]);

        let (low, high, observed) = if first < second {
            (first, second, SidePair { low: first_side, high: second_side })
        } else {
            (second, first, SidePair { low: second_side, high: first_side })
        };

        if let Some(original) = CANONICAL_ADJACENCY[low as usize][high as usize] {
            similarity.index_matches += 1;
            if original == observed {
                similarity.side_matches += 1;
            }
        }
    }

    similarity
}

/// Formats a solution as a 5x5 grid of piece indexes followed by the
/// center rotations.
pub fn format_solution(solution: &PuzzleSolution) -> String {
    let mut output = String::new();
    for row in 0..GRID_DIM {
        let line: Vec<String> = (0..GRID_DIM)
            .map(|col| format!("{:02}", solution.indexes[coord_to_idx(row, col)]))
            .collect();
        output.push_str(&line.join(" "));
        output.push('\n');
    }

    output.push_str("Rotations:\n");
    for row in 1..GRID_DIM - 1 {
        let line: Vec<String> = (1..GRID_DIM - 1)
            .map(|col| solution.rotations[coord_to_idx(row, col)].to_string())
            .collect();
        output.push_str(&line.join(" "));
        output.push('\n');
    }

    output
}
