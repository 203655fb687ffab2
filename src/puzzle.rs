//! Puzzle state: the 40 boundary connectors and the 25 pieces cut from them.

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::grid::{
    boundary_toward, frame_side, kind_of, BOUNDARIES, CENTER_CELLS, CORNER_CELLS, EDGE_CELLS,
    GRID_DIM, NUM_BOUNDARIES, NUM_CELLS,
};
use crate::pieces::{Connector, Direction, Piece, PieceKind};

/// Largest unique-connector count that can appear in an explicit layout:
/// one shape per boundary.
pub const MAX_UNIQUE_CONNECTORS: usize = NUM_BOUNDARIES;

/// Largest unique-connector count random generation accepts. Each shape has
/// to appear on at least two boundaries, otherwise it can only ever sit in
/// its original place.
pub const MAX_SHUFFLED_CONNECTORS: usize = NUM_BOUNDARIES / 2;

/// Connectors per shape placed before the random fill.
const MIN_OCCURRENCES: usize = 2;

/// One puzzle instance.
///
/// `connections` is the source of truth; `pieces` is always the result of
/// rebuilding from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    connections: [Connector; NUM_BOUNDARIES],
    pieces: [Piece; NUM_CELLS],
    unique_connectors: u8,
}

impl Puzzle {
    /// Creates a random puzzle with `unique_connectors` connector shapes.
    pub fn new<R: Rng + ?Sized>(unique_connectors: usize, rng: &mut R) -> Result<Self> {
        validate_shuffled_connectors(unique_connectors)?;

        let mut puzzle = Self {
            connections: [0; NUM_BOUNDARIES],
            pieces: [Piece::EMPTY; NUM_CELLS],
            unique_connectors: unique_connectors as u8,
        };
        puzzle.shuffle(rng)?;
        Ok(puzzle)
    }

    /// Creates a puzzle from an explicit boundary array.
    ///
    /// Every connector must be non-zero with magnitude at most
    /// `unique_connectors`.
    pub fn from_connections(
        unique_connectors: usize,
        connections: [Connector; NUM_BOUNDARIES],
    ) -> Result<Self> {
        validate_unique_connectors(unique_connectors)?;
        if unique_connectors > MAX_UNIQUE_CONNECTORS {
            return Err(Error::TooManyConnectors {
                count: unique_connectors,
                slots: NUM_BOUNDARIES,
            });
        }
        for (slot, &value) in connections.iter().enumerate() {
            if value == 0 || value.unsigned_abs() as usize > unique_connectors {
                return Err(Error::ConnectorOutOfRange {
                    slot,
                    value,
                    max: unique_connectors,
                });
            }
        }

        Ok(Self {
            connections,
            pieces: build_pieces(&connections),
            unique_connectors: unique_connectors as u8,
        })
    }

    /// Draws a fresh connector assignment and rebuilds every piece.
    ///
    /// Each shape is placed twice, the rest of the boundaries get uniformly
    /// random shapes, every connector gets a random orientation, and the
    /// whole array is Fisher-Yates shuffled.
    ///
    /// Fails without touching the puzzle when it has more shapes than can
    /// each be placed twice, which only happens for explicit layouts.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let unique = self.unique_connectors as usize;
        validate_shuffled_connectors(unique)?;
        let seeded = unique * MIN_OCCURRENCES;

        for (slot, value) in self.connections[..seeded].iter_mut().enumerate() {
            let shape = (slot / MIN_OCCURRENCES + 1) as Connector;
            *value = orient(shape, rng);
        }
        for value in &mut self.connections[seeded..] {
            let shape = rng.random_range(1..=unique) as Connector;
            *value = orient(shape, rng);
        }

        self.connections.shuffle(rng);
        self.rebuild();
        Ok(())
    }

    /// Turns `self` into a mutated copy of `parent`.
    ///
    /// Applies between `min_mutations` and `max_mutations` swaps of two
    /// distinct boundaries; more swaps are added while the result still
    /// equals the parent. A parent whose connectors are all equal is
    /// reshuffled instead, which fails like [`Puzzle::shuffle`].
    pub fn mutate_from<R: Rng + ?Sized>(
        &mut self,
        parent: &Puzzle,
        min_mutations: usize,
        max_mutations: usize,
        rng: &mut R,
    ) -> Result<()> {
        self.unique_connectors = parent.unique_connectors;
        self.connections = parent.connections;

        // no swap can change a uniform array
        if parent.connections.iter().all(|&c| c == parent.connections[0]) {
            warn!("mutation parent has a single connector value; reshuffling instead");
            return self.shuffle(rng);
        }

        let mut remaining = rng.random_range(min_mutations..=max_mutations);
        while remaining > 0 {
            let first = rng.random_range(0..NUM_BOUNDARIES);
            let mut second = rng.random_range(0..NUM_BOUNDARIES);
            while second == first {
                second = rng.random_range(0..NUM_BOUNDARIES);
            }
            self.connections.swap(first, second);

            remaining -= 1;
            if remaining == 0 && self.connections == parent.connections {
                remaining = 1;
            }
        }

        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        self.pieces = build_pieces(&self.connections);
    }

    /// The boundary connectors, in boundary order.
    pub fn connections(&self) -> &[Connector; NUM_BOUNDARIES] {
        &self.connections
    }

    /// Number of distinct connector shapes.
    pub fn unique_connectors(&self) -> usize {
        self.unique_connectors as usize
    }

    /// All pieces, indexed by original cell.
    pub fn pieces(&self) -> &[Piece; NUM_CELLS] {
        &self.pieces
    }

    /// Returns the piece originally at `index`.
    #[inline(always)]
    pub fn piece(&self, index: u8) -> &Piece {
        &self.pieces[index as usize]
    }

    /// The four corner pieces, clockwise from the top-left.
    pub fn corners(&self) -> impl Iterator<Item = &Piece> + '_ {
        CORNER_CELLS.iter().map(|&cell| &self.pieces[cell])
    }

    /// The twelve edge pieces.
    pub fn edges(&self) -> impl Iterator<Item = &Piece> + '_ {
        EDGE_CELLS.iter().map(|&cell| &self.pieces[cell])
    }

    /// The nine center pieces.
    pub fn centers(&self) -> impl Iterator<Item = &Piece> + '_ {
        CENTER_CELLS.iter().map(|&cell| &self.pieces[cell])
    }
}

fn validate_unique_connectors(unique_connectors: usize) -> Result<()> {
    if unique_connectors == 0 {
        return Err(Error::NoConnectors);
    }
    Ok(())
}

/// Checks that random generation can place every shape at least twice.
pub fn validate_shuffled_connectors(unique_connectors: usize) -> Result<()> {
    validate_unique_connectors(unique_connectors)?;
    if unique_connectors > MAX_SHUFFLED_CONNECTORS {
        return Err(Error::TooManyConnectors {
            count: unique_connectors,
            slots: NUM_BOUNDARIES,
        });
    }
    Ok(())
}

fn orient<R: Rng + ?Sized>(shape: Connector, rng: &mut R) -> Connector {
    if rng.random_bool(0.5) {
        -shape
    } else {
        shape
    }
}

/// Cuts the 25 pieces out of a boundary array.
///
/// Each cell reads the boundary on every board side (negated when it is the
/// boundary's second cell) and stores it under its own frame label.
fn build_pieces(connections: &[Connector; NUM_BOUNDARIES]) -> [Piece; NUM_CELLS] {
    let mut pieces = [Piece::EMPTY; NUM_CELLS];
    for (cell, piece) in pieces.iter_mut().enumerate() {
        let mut sides = [0; 4];
        for heading in Direction::ALL {
            if let Some(number) = boundary_toward(cell, heading) {
                let value = connections[number];
                let facing = if BOUNDARIES[number].first == cell {
                    value
                } else {
                    -value
                };
                sides[frame_side(cell, heading).index()] = facing;
            }
        }
        *piece = Piece::new(kind_of(cell), cell as u8, sides);
    }
    pieces
}

/// Formats every piece's sides, one row of the original layout per block.
pub fn format_layout(puzzle: &Puzzle) -> String {
    let mut output = String::new();
    for piece in puzzle.pieces() {
        if piece.index as usize % GRID_DIM == 0 {
            output.push_str("--------------------\n");
        }
        let kind = match piece.kind {
            PieceKind::Corner => "Corner",
            PieceKind::Edge => "Edge",
            PieceKind::Center => "Center",
        };
        output.push_str(&format!(
            "{:2}: {:3} {:3} {:3} {:3} ({kind})\n",
            piece.index,
            piece.side(Direction::Top),
            piece.side(Direction::Right),
            piece.side(Direction::Bottom),
            piece.side(Direction::Left),
        ));
    }
    output
}
