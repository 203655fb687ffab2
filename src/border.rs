//! Border search: edge strips and complete corner/edge rings.
//!
//! A strip is three edge pieces walked clockwise between two corners. Strips
//! are enumerated once per puzzle, then combined four at a time around each
//! distinct arrangement of the corners.

use log::error;

use crate::pieces::{connects, Direction};
use crate::puzzle::Puzzle;

/// Corner arrangements (top-left, top-right, bottom-right, bottom-left) that
/// differ by more than a rotation of the whole puzzle. Corner 0 stays at the
/// top-left.
pub const CORNER_ARRANGEMENTS: [[u8; 4]; 6] = [
    [0, 4, 24, 20],
    [0, 4, 20, 24],
    [0, 24, 4, 20],
    [0, 24, 20, 4],
    [0, 20, 4, 24],
    [0, 20, 24, 4],
];

/// Three pieces forming one strip or one center row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TripleIndex {
    pub indexes: [u8; 3],
    /// Quarter turns per piece; always 0 for border strips.
    pub rotations: [u8; 3],
}

impl TripleIndex {
    /// Creates an unrotated triple.
    pub fn new(indexes: [u8; 3]) -> Self {
        Self {
            indexes,
            rotations: [0; 3],
        }
    }

    /// Bitmask of the pieces used (bit `i` set = piece `i`).
    #[inline(always)]
    pub fn mask(&self) -> u32 {
        self.indexes.iter().fold(0, |mask, &index| mask | 1u32 << index)
    }
}

/// One complete border.
///
/// Strips are stored in board order: top and bottom left-to-right, left and
/// right top-to-bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeSolution {
    /// Top-left, top-right, bottom-right, bottom-left.
    pub corners: [u8; 4],
    pub top: [u8; 3],
    pub right: [u8; 3],
    pub bottom: [u8; 3],
    pub left: [u8; 3],
}

impl EdgeSolution {
    /// The border as originally laid out.
    pub const IDENTITY: Self = Self {
        corners: [0, 4, 24, 20],
        top: [1, 2, 3],
        right: [9, 14, 19],
        bottom: [21, 22, 23],
        left: [5, 10, 15],
    };

    /// Builds a border from four strips in clockwise walking order.
    ///
    /// The bottom and left strips are walked right-to-left and
    /// bottom-to-top, so they are reversed into board order.
    fn from_walk(corners: [u8; 4], walked: [[u8; 3]; 4]) -> Self {
        let [top, right, mut bottom, mut left] = walked;
        bottom.reverse();
        left.reverse();
        Self {
            corners,
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Collects every strip that could sit between some pair of corners.
///
/// The first piece's `Left` must join some corner's `Right`, consecutive
/// pieces must join, and the third piece's `Right` must join some corner's
/// `Left`.
pub fn enumerate_border_triples(puzzle: &Puzzle, triples: &mut Vec<TripleIndex>) {
    triples.clear();

    let corner_rights: Vec<_> = puzzle.corners().map(|c| c.side(Direction::Right)).collect();
    let corner_lefts: Vec<_> = puzzle.corners().map(|c| c.side(Direction::Left)).collect();

    for first in puzzle.edges() {
        let first_left = first.side(Direction::Left);
        if !corner_rights.iter().any(|&right| connects(right, first_left)) {
            continue;
        }
        let first_right = first.side(Direction::Right);

        for second in puzzle.edges() {
            if second.index == first.index || !connects(first_right, second.side(Direction::Left))
            {
                continue;
            }
            let second_right = second.side(Direction::Right);

            for third in puzzle.edges() {
                if third.index == first.index
                    || third.index == second.index
                    || !connects(second_right, third.side(Direction::Left))
                {
                    continue;
                }
                let third_right = third.side(Direction::Right);
                if !corner_lefts.iter().any(|&left| connects(third_right, left)) {
                    continue;
                }

                triples.push(TripleIndex::new([first.index, second.index, third.index]));
            }
        }
    }
}

/// Per-depth strip candidates, reused across corner arrangements and
/// puzzles.
pub type BorderCandidates = [Vec<usize>; 4];

/// Finds every border for one corner arrangement and appends it to `solutions`.
///
/// Strips are chosen top, right, bottom, left. A strip is skipped when it
/// shares a piece with a strip already chosen or when its ends do not join
/// the two corners bounding its position.
pub fn assemble_border(
    puzzle: &Puzzle,
    corners: &[u8; 4],
    triples: &[TripleIndex],
    candidates: &mut BorderCandidates,
    solutions: &mut Vec<EdgeSolution>,
) {
    // strips whose ends meet the two corners bounding each position
    for (depth, list) in candidates.iter_mut().enumerate() {
        let start = puzzle.piece(corners[depth]).side(Direction::Right);
        let end = puzzle.piece(corners[(depth + 1) % 4]).side(Direction::Left);
        list.clear();
        list.extend(
            triples
                .iter()
                .enumerate()
                .filter(|(_, triple)| {
                    let [first, _, third] = triple.indexes;
                    connects(start, puzzle.piece(first).side(Direction::Left))
                        && connects(puzzle.piece(third).side(Direction::Right), end)
                })
                .map(|(i, _)| i),
        );
    }

    assemble_from(corners, triples, candidates, [0; 4], 0, 0, solutions);
}

fn assemble_from(
    corners: &[u8; 4],
    triples: &[TripleIndex],
    candidates: &[Vec<usize>; 4],
    chosen: [usize; 4],
    depth: usize,
    used: u32,
    solutions: &mut Vec<EdgeSolution>,
) {
    if depth == 4 {
        let walked = chosen.map(|i| triples[i].indexes);
        solutions.push(EdgeSolution::from_walk(*corners, walked));
        return;
    }

    for &i in &candidates[depth] {
        // also rules out re-using a strip chosen at a shallower depth
        let mask = triples[i].mask();
        if used & mask != 0 {
            continue;
        }

        let mut next = chosen;
        next[depth] = i;
        assemble_from(corners, triples, candidates, next, depth + 1, used | mask, solutions);
    }
}

/// Enumerates strips and then every border over all corner arrangements.
///
/// An empty result means the puzzle is inconsistent, since the original
/// border always assembles; it is reported rather than treated as fatal.
pub fn find_edge_solutions(
    puzzle: &Puzzle,
    triples: &mut Vec<TripleIndex>,
    candidates: &mut BorderCandidates,
    solutions: &mut Vec<EdgeSolution>,
) {
    enumerate_border_triples(puzzle, triples);
    solutions.clear();
    for corners in &CORNER_ARRANGEMENTS {
        assemble_border(puzzle, corners, triples, candidates, solutions);
    }

    if solutions.is_empty() {
        error!(
            "no border assembles from {} strips; connections {:?}",
            triples.len(),
            puzzle.connections()
        );
    }
}
