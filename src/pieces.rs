//! Piece and connector definitions.
//!
//! Every grid cell becomes one piece with four sides. A side carries a signed
//! connector: the magnitude names the shape, the sign says whether it is an
//! outie (positive) or an innie (negative). Flat sides on the puzzle border
//! are stored as 0.

/// A signed connector value in `-K..=K`, with 0 reserved for flat sides.
pub type Connector = i8;

/// Side of a piece, in the piece's own frame.
///
/// Discriminants are the side's slot in [`Piece::sides`], so rotation is plain
/// modular arithmetic on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Direction {
    /// All directions in slot order.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Returns the side slot for this direction.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the direction for a slot, taken mod 4.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Direction::Top,
            1 => Direction::Right,
            2 => Direction::Bottom,
            _ => Direction::Left,
        }
    }

    /// Returns the direction `rotation` quarter turns along the side order.
    #[inline(always)]
    pub const fn rotated(self, rotation: u8) -> Self {
        Self::from_index(self.index() + rotation as usize)
    }

    /// Returns the direction facing the other way.
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        self.rotated(2)
    }
}

/// Role of a piece, fixed by its original grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// Two flat sides; only `Right` and `Left` carry connectors.
    Corner,
    /// One flat side (`Top`); `Left`, `Right` and `Bottom` carry connectors.
    Edge,
    /// Four connectors.
    Center,
}

/// One puzzle piece.
///
/// Pieces are rebuilt wholesale from a puzzle's connections and are never
/// edited in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Connectors in `Direction` slot order.
    pub sides: [Connector; 4],
    /// Cell this piece occupies in the original layout (0-24, row-major).
    pub index: u8,
    /// Bit `m` is set when connector magnitude `m` appears on any side.
    pub shapes: u64,
}

impl Piece {
    /// A placeholder used to initialise fixed-size piece arrays.
    pub const EMPTY: Self = Self {
        kind: PieceKind::Center,
        sides: [0; 4],
        index: 0,
        shapes: 0,
    };

    /// Creates a piece and records which connector shapes it carries.
    pub fn new(kind: PieceKind, index: u8, sides: [Connector; 4]) -> Self {
        debug_assert!(sides.iter().all(|side| side.unsigned_abs() < 64));
        let shapes = sides
            .iter()
            .filter(|&&side| side != 0)
            .fold(0u64, |mask, &side| mask | 1u64 << side.unsigned_abs());

        Self {
            kind,
            sides,
            index,
            shapes,
        }
    }

    /// Returns the connector on a side without any rotation.
    #[inline(always)]
    pub fn side(&self, direction: Direction) -> Connector {
        self.sides[direction.index()]
    }

    /// Returns the connector facing `direction` after `rotation` quarter turns.
    ///
    /// Rotation 0 is the piece as built; each increment turns it
    /// counter-clockwise, so `Top` at rotation 1 reads the original `Right`.
    #[inline(always)]
    pub fn side_with_rotation(&self, direction: Direction, rotation: u8) -> Connector {
        self.sides[direction.rotated(rotation).index()]
    }

    /// Returns true when some side carries connector magnitude `shape`.
    #[inline(always)]
    pub fn has_shape(&self, shape: u8) -> bool {
        (self.shapes >> shape) & 1 == 1
    }
}

/// The single compatibility rule for two facing sides.
///
/// Sides join when they carry the same shape with opposite orientation.
/// Flat sides never join anything.
#[inline(always)]
pub fn connects(first: Connector, second: Connector) -> bool {
    first != 0 && first == -second
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_connects_requires_opposite_signs() {
        assert!(connects(3, -3));
        assert!(connects(-7, 7));
        assert!(!connects(3, 3));
        assert!(!connects(3, -2));
    }

    #[test]
    fn test_flat_sides_never_connect() {
        assert!(!connects(0, 0));
        assert!(!connects(0, 4));
        assert!(!connects(-4, 0));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn test_rotation_is_periodic(#[case] rotation: u8) {
        let piece = Piece::new(PieceKind::Center, 12, [1, -2, 3, -4]);
        for direction in Direction::ALL {
            assert_eq!(
                piece.side_with_rotation(direction, rotation),
                piece.side_with_rotation(direction, rotation + 4),
                "{direction:?} at rotation {rotation}"
            );
        }
    }

    #[test]
    fn test_rotation_reads_next_side() {
        let piece = Piece::new(PieceKind::Center, 6, [1, -2, 3, -4]);
        assert_eq!(piece.side_with_rotation(Direction::Top, 0), 1);
        assert_eq!(piece.side_with_rotation(Direction::Top, 1), -2);
        assert_eq!(piece.side_with_rotation(Direction::Left, 1), 1);
        assert_eq!(piece.side_with_rotation(Direction::Bottom, 3), -2);
    }

    #[test]
    fn test_shapes_ignore_flat_sides_and_sign() {
        let piece = Piece::new(PieceKind::Edge, 2, [0, 5, -5, -9]);
        assert!(piece.has_shape(5));
        assert!(piece.has_shape(9));
        assert!(!piece.has_shape(0));
        assert!(!piece.has_shape(1));
        assert_eq!(piece.shapes.count_ones(), 2);
    }

    #[test]
    fn test_opposite_direction() {
        assert_eq!(Direction::Top.opposite(), Direction::Bottom);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }
}
