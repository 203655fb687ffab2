//! Center search: rotated rows of three and complete 3x3 blocks.
//!
//! Unlike border strips, center pieces may be placed at any of four
//! rotations, so each row candidate carries a rotation per piece. Rows are
//! enumerated per border because their exposed ends have to meet that
//! border's left and right strips.

use crate::border::{EdgeSolution, TripleIndex};
use crate::pieces::{connects, Connector, Direction, Piece};
use crate::puzzle::Puzzle;

/// A complete center block for one border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CenterSolution {
    /// Piece indexes, `[row][col]`.
    pub indexes: [[u8; 3]; 3],
    /// Quarter turns, `[row][col]`.
    pub rotations: [[u8; 3]; 3],
}

impl CenterSolution {
    /// The center block as originally laid out, unrotated.
    pub const IDENTITY: Self = Self {
        indexes: [[6, 7, 8], [11, 12, 13], [16, 17, 18]],
        rotations: [[0; 3]; 3],
    };
}

/// Inward-facing connectors of a border, the values a center block must meet.
struct BorderFaces {
    top: [Connector; 3],
    bottom: [Connector; 3],
    left: [Connector; 3],
    right: [Connector; 3],
}

impl BorderFaces {
    fn new(puzzle: &Puzzle, edges: &EdgeSolution) -> Self {
        let inward = |strip: [u8; 3]| strip.map(|index| puzzle.piece(index).side(Direction::Bottom));
        Self {
            top: inward(edges.top),
            bottom: inward(edges.bottom),
            left: inward(edges.left),
            right: inward(edges.right),
        }
    }

    /// Checks the row's ends against row `depth` of the left and right
    /// strips, plus the top strip for the first row and the bottom strip
    /// for the last.
    fn meets(&self, puzzle: &Puzzle, row: &TripleIndex, depth: usize) -> bool {
        if !connects(self.left[depth], facing(puzzle, row, 0, Direction::Left))
            || !connects(facing(puzzle, row, 2, Direction::Right), self.right[depth])
        {
            return false;
        }
        (0..3).all(|col| {
            (depth != 0 || connects(self.top[col], facing(puzzle, row, col, Direction::Top)))
                && (depth != 2
                    || connects(facing(puzzle, row, col, Direction::Bottom), self.bottom[col]))
        })
    }
}

#[inline(always)]
fn facing(puzzle: &Puzzle, row: &TripleIndex, col: usize, direction: Direction) -> Connector {
    puzzle
        .piece(row.indexes[col])
        .side_with_rotation(direction, row.rotations[col])
}

/// Returns true when a piece could meet `connector` at some rotation.
#[inline(always)]
fn could_meet(piece: &Piece, connector: Connector) -> bool {
    piece.has_shape(connector.unsigned_abs())
}

/// Collects every rotated row of three distinct center pieces whose joints
/// match and whose ends meet one of the border's left and right strips.
pub fn enumerate_center_rows(puzzle: &Puzzle, edges: &EdgeSolution, rows: &mut Vec<TripleIndex>) {
    rows.clear();
    let faces = BorderFaces::new(puzzle, edges);

    for first in puzzle.centers() {
        for first_rotation in 0..4 {
            let first_left = first.side_with_rotation(Direction::Left, first_rotation);
            if !faces.left.iter().any(|&left| connects(left, first_left)) {
                continue;
            }
            let first_right = first.side_with_rotation(Direction::Right, first_rotation);

            for second in puzzle.centers() {
                if second.index == first.index || !could_meet(second, first_right) {
                    continue;
                }
                for second_rotation in 0..4 {
                    if !connects(
                        first_right,
                        second.side_with_rotation(Direction::Left, second_rotation),
                    ) {
                        continue;
                    }
                    let second_right = second.side_with_rotation(Direction::Right, second_rotation);

                    for third in puzzle.centers() {
                        if third.index == first.index
                            || third.index == second.index
                            || !could_meet(third, second_right)
                        {
                            continue;
                        }
                        for third_rotation in 0..4 {
                            if !connects(
                                second_right,
                                third.side_with_rotation(Direction::Left, third_rotation),
                            ) {
                                continue;
                            }
                            let third_right =
                                third.side_with_rotation(Direction::Right, third_rotation);
                            if !faces.right.iter().any(|&right| connects(third_right, right)) {
                                continue;
                            }

                            rows.push(TripleIndex {
                                indexes: [first.index, second.index, third.index],
                                rotations: [first_rotation, second_rotation, third_rotation],
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Per-depth row candidates, reused across borders.
pub type CenterCandidates = [Vec<usize>; 3];

/// Finds every center block for `edges` and appends it to `solutions`.
///
/// Rows are placed top to bottom. Besides using distinct pieces, each row
/// must meet its own left and right border pieces, the row above (or the
/// top strip), and for the last row the bottom strip.
pub fn assemble_center(
    puzzle: &Puzzle,
    edges: &EdgeSolution,
    rows: &[TripleIndex],
    candidates: &mut CenterCandidates,
    solutions: &mut Vec<CenterSolution>,
) {
    let faces = BorderFaces::new(puzzle, edges);

    // rows that meet the border at each depth; only the joint with the row
    // above is left to check during the search
    for (depth, list) in candidates.iter_mut().enumerate() {
        list.clear();
        list.extend(
            rows.iter()
                .enumerate()
                .filter(|(_, row)| faces.meets(puzzle, row, depth))
                .map(|(i, _)| i),
        );
    }

    assemble_from(puzzle, rows, candidates, [0; 3], 0, 0, solutions);
}

fn assemble_from(
    puzzle: &Puzzle,
    rows: &[TripleIndex],
    candidates: &[Vec<usize>; 3],
    chosen: [usize; 3],
    depth: usize,
    used: u32,
    solutions: &mut Vec<CenterSolution>,
) {
    if depth == 3 {
        solutions.push(CenterSolution {
            indexes: chosen.map(|i| rows[i].indexes),
            rotations: chosen.map(|i| rows[i].rotations),
        });
        return;
    }

    for &i in &candidates[depth] {
        let row = &rows[i];
        let mask = row.mask();
        if used & mask != 0 {
            continue;
        }

        if depth > 0 {
            let above = &rows[chosen[depth - 1]];
            let joins = (0..3).all(|col| {
                connects(
                    facing(puzzle, above, col, Direction::Bottom),
                    facing(puzzle, row, col, Direction::Top),
                )
            });
            if !joins {
                continue;
            }
        }

        let mut next = chosen;
        next[depth] = i;
        assemble_from(puzzle, rows, candidates, next, depth + 1, used | mask, solutions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::find_edge_solutions;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn solve_centers(puzzle: &Puzzle, edges: &EdgeSolution) -> Vec<CenterSolution> {
        let mut rows = Vec::new();
        let mut solutions = Vec::new();
        enumerate_center_rows(puzzle, edges, &mut rows);
        assemble_center(puzzle, edges, &rows, &mut Default::default(), &mut solutions);
        solutions
    }

    #[test]
    fn test_original_rows_are_enumerated() {
        let mut rng = Pcg32::seed_from_u64(12);
        let puzzle = Puzzle::new(6, &mut rng).unwrap();
        let mut rows = Vec::new();
        enumerate_center_rows(&puzzle, &EdgeSolution::IDENTITY, &mut rows);

        for indexes in CenterSolution::IDENTITY.indexes {
            assert!(rows.contains(&TripleIndex::new(indexes)), "missing row {indexes:?}");
        }
    }

    #[test]
    fn test_original_center_is_assembled() {
        let mut rng = Pcg32::seed_from_u64(13);
        for unique in [3, 8, 15, 20] {
            let puzzle = Puzzle::new(unique, &mut rng).unwrap();
            let solutions = solve_centers(&puzzle, &EdgeSolution::IDENTITY);
            assert!(
                solutions.contains(&CenterSolution::IDENTITY),
                "identity center missing for {unique} connectors"
            );
        }
    }

    #[test]
    fn test_center_blocks_use_each_piece_once() {
        let mut rng = Pcg32::seed_from_u64(14);
        let puzzle = Puzzle::new(2, &mut rng).unwrap();
        let solutions = solve_centers(&puzzle, &EdgeSolution::IDENTITY);

        assert!(!solutions.is_empty());
        for solution in &solutions {
            let mut pieces: Vec<u8> = solution.indexes.iter().flatten().copied().collect();
            pieces.sort_unstable();
            assert_eq!(pieces, vec![6, 7, 8, 11, 12, 13, 16, 17, 18]);
            assert!(solution.rotations.iter().flatten().all(|&r| r < 4));
        }
    }

    #[test]
    fn test_center_blocks_meet_their_border() {
        let mut rng = Pcg32::seed_from_u64(15);
        let puzzle = Puzzle::new(3, &mut rng).unwrap();
        let mut triples = Vec::new();
        let mut borders = Vec::new();
        find_edge_solutions(&puzzle, &mut triples, &mut Default::default(), &mut borders);

        for edges in borders.iter().take(20) {
            let faces = BorderFaces::new(&puzzle, edges);
            for solution in solve_centers(&puzzle, edges) {
                let side = |row: usize, col: usize, direction| {
                    puzzle
                        .piece(solution.indexes[row][col])
                        .side_with_rotation(direction, solution.rotations[row][col])
                };
                for i in 0..3 {
                    assert!(connects(faces.top[i], side(0, i, Direction::Top)));
                    assert!(connects(side(2, i, Direction::Bottom), faces.bottom[i]));
                    assert!(connects(faces.left[i], side(i, 0, Direction::Left)));
                    assert!(connects(side(i, 2, Direction::Right), faces.right[i]));
                }
                for row in 0..3 {
                    for col in 0..2 {
                        assert!(connects(
                            side(row, col, Direction::Right),
                            side(row, col + 1, Direction::Left)
                        ));
                    }
                }
                for row in 0..2 {
                    for col in 0..3 {
                        assert!(connects(
                            side(row, col, Direction::Bottom),
                            side(row + 1, col, Direction::Top)
                        ));
                    }
                }
            }
        }
    }
}
