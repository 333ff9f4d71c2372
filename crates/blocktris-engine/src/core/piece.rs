use serde::{Deserialize, Serialize};

use super::{arena::Arena, arena::Cell, rotation};

/// A falling piece (tetromino) with its kind, orientation and position.
///
/// Pieces are immutable values: movement and rotation return new `Piece`s and
/// leave `self` untouched. The shape grid is never stored in the piece
/// itself; it is looked up from the static catalog by `(kind, rotation)`.
///
/// # Coordinate System
///
/// - `position` is the top-left corner of the shape grid inside the arena
/// - X increases rightward (columns), Y increases downward (rows)
/// - Y may be negative while a piece is partially above the arena
///
/// # Example
///
/// ```
/// use blocktris_engine::{Piece, PieceKind, RotationDirection};
///
/// let piece = Piece::spawn(PieceKind::T, 12);
/// assert_eq!((piece.position().x(), piece.position().y()), (5, 0));
///
/// let moved = piece.right().rotated(RotationDirection::Clockwise);
/// assert_eq!(moved.shape().width(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, rotation: PieceRotation, position: PiecePosition) -> Self {
        Self {
            position,
            rotation,
            kind,
        }
    }

    /// Creates a piece in its spawn orientation, horizontally centered on row 0.
    ///
    /// The column is `floor(arena_width / 2) - floor(shape_width / 2)`.
    #[must_use]
    pub fn spawn(kind: PieceKind, arena_width: u16) -> Self {
        let rotation = PieceRotation::SPAWN;
        let shape_width = i32::from(kind.shape(rotation).width);
        let x = i32::from(arena_width / 2) - shape_width / 2;
        Self::new(kind, rotation, PiecePosition::new(x, 0))
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape(self.rotation)
    }

    /// Returns the arena coordinates of every occupied cell of the piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .occupied_positions()
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.shifted(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    #[must_use]
    pub fn up(&self) -> Self {
        self.shifted(0, -1)
    }

    /// Rotates in place without any wall kick.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            rotation: self.rotation.rotated(direction),
            ..*self
        }
    }

    /// Rotates with wall kicks, returning `None` when every kick candidate collides.
    #[must_use]
    pub fn super_rotated(&self, direction: RotationDirection, arena: &Arena) -> Option<Self> {
        rotation::kick_rotation(arena, *self, direction)
    }

    /// Returns where the piece would land if dropped straight down (the ghost).
    #[must_use]
    pub fn simulate_drop_position(&self, arena: &Arena) -> Self {
        let mut dropped = *self;
        while !arena.is_colliding(&dropped.down()) {
            dropped = dropped.down();
        }
        dropped
    }
}

/// Position of a piece's shape grid inside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Direction of a rotation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Orientation of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation wraps around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    /// Creates an orientation from its index, wrapping modulo 4.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            RotationDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven piece kinds.
///
/// The discriminant is the cell tag stored in the arena (1..=7), which also
/// serves as the colour index for renderers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// J-piece.
    J = 2,
    /// L-piece.
    L = 3,
    /// O-piece.
    O = 4,
    /// S-piece.
    S = 5,
    /// T-piece.
    T = 6,
    /// Z-piece.
    Z = 7,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All kinds in tag order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the cell tag (1..=7).
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Parses a cell tag; `0` and values above 7 are not piece kinds.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize - 1
    }

    /// Returns the canonical shape of this kind in the given orientation.
    #[must_use]
    pub fn shape(self, rotation: PieceRotation) -> &'static Shape {
        &PIECE_SHAPES[self.index()][rotation.as_usize()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('O'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

const MAX_SHAPE_SIZE: usize = 4;

/// Immutable grid of cells describing one orientation of a piece kind.
///
/// Grids are at most 4×4 and are not padded: the I-piece spawns as a 4×1
/// grid, the O-piece as 2×2, and the rest as 3×2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[Cell; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    const fn new(width: u8, height: u8, cells: [[Cell; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE]) -> Self {
        Self {
            width,
            height,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns the cell at `(x, y)`, or `Cell::Empty` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if x < self.width() && y < self.height() {
            self.cells[y][x]
        } else {
            Cell::Empty
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Returns grid-relative coordinates of the occupied cells, row by row.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows().zip(0..).flat_map(|(row, dy)| {
            row.iter()
                .zip(0..)
                .filter(|(cell, _)| !cell.is_empty())
                .map(move |(_, dx)| (dx, dy))
        })
    }

    /// Builds the grid rotated a quarter turn.
    ///
    /// Clockwise is transpose then reverse each row; counter-clockwise is
    /// transpose then reverse the row order.
    #[must_use]
    pub const fn rotated(&self, direction: RotationDirection) -> Self {
        let transposed = self.transposed();
        match direction {
            RotationDirection::Clockwise => transposed.with_reversed_rows(),
            RotationDirection::CounterClockwise => transposed.with_reversed_row_order(),
        }
    }

    const fn transposed(&self) -> Self {
        let mut cells = [[Cell::Empty; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < self.width() {
            let mut x = 0;
            while x < self.height() {
                cells[y][x] = self.cells[x][y];
                x += 1;
            }
            y += 1;
        }
        Self::new(self.height, self.width, cells)
    }

    const fn with_reversed_rows(&self) -> Self {
        let mut cells = [[Cell::Empty; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let width = self.width();
        let mut y = 0;
        while y < self.height() {
            let mut x = 0;
            while x < width {
                cells[y][x] = self.cells[y][width - 1 - x];
                x += 1;
            }
            y += 1;
        }
        Self::new(self.width, self.height, cells)
    }

    const fn with_reversed_row_order(&self) -> Self {
        let mut cells = [[Cell::Empty; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let height = self.height();
        let mut y = 0;
        while y < height {
            cells[y] = self.cells[height - 1 - y];
            y += 1;
        }
        Self::new(self.width, self.height, cells)
    }
}

/// Generates all four orientations by repeatedly rotating the spawn grid clockwise.
const fn shape_rotations(spawn: Shape) -> [Shape; 4] {
    let mut rotations = [spawn; 4];
    let mut i = 1;
    while i < 4 {
        rotations[i] = rotations[i - 1].rotated(RotationDirection::Clockwise);
        i += 1;
    }
    rotations
}

static PIECE_SHAPES: [[Shape; 4]; PieceKind::LEN] = {
    use Cell::Empty as E;
    const I: Cell = Cell::Piece(PieceKind::I);
    const J: Cell = Cell::Piece(PieceKind::J);
    const L: Cell = Cell::Piece(PieceKind::L);
    const O: Cell = Cell::Piece(PieceKind::O);
    const S: Cell = Cell::Piece(PieceKind::S);
    const T: Cell = Cell::Piece(PieceKind::T);
    const Z: Cell = Cell::Piece(PieceKind::Z);
    const EEEE: [Cell; 4] = [E; 4];
    [
        shape_rotations(Shape::new(4, 1, [[I, I, I, I], EEEE, EEEE, EEEE])),
        shape_rotations(Shape::new(3, 2, [[J, E, E, E], [J, J, J, E], EEEE, EEEE])),
        shape_rotations(Shape::new(3, 2, [[E, E, L, E], [L, L, L, E], EEEE, EEEE])),
        shape_rotations(Shape::new(2, 2, [[O, O, E, E], [O, O, E, E], EEEE, EEEE])),
        shape_rotations(Shape::new(3, 2, [[E, S, S, E], [S, S, E, E], EEEE, EEEE])),
        shape_rotations(Shape::new(3, 2, [[E, T, E, E], [T, T, T, E], EEEE, EEEE])),
        shape_rotations(Shape::new(3, 2, [[Z, Z, E, E], [E, Z, Z, E], EEEE, EEEE])),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(shape: &Shape) -> Vec<Vec<u8>> {
        shape
            .rows()
            .map(|row| row.iter().map(|cell| cell.tag()).collect())
            .collect()
    }

    #[test]
    fn test_spawn_shapes_match_catalog() {
        let spawn = |kind: PieceKind| tags(kind.shape(PieceRotation::SPAWN));
        assert_eq!(spawn(PieceKind::I), vec![vec![1, 1, 1, 1]]);
        assert_eq!(spawn(PieceKind::J), vec![vec![2, 0, 0], vec![2, 2, 2]]);
        assert_eq!(spawn(PieceKind::L), vec![vec![0, 0, 3], vec![3, 3, 3]]);
        assert_eq!(spawn(PieceKind::O), vec![vec![4, 4], vec![4, 4]]);
        assert_eq!(spawn(PieceKind::S), vec![vec![0, 5, 5], vec![5, 5, 0]]);
        assert_eq!(spawn(PieceKind::T), vec![vec![0, 6, 0], vec![6, 6, 6]]);
        assert_eq!(spawn(PieceKind::Z), vec![vec![7, 7, 0], vec![0, 7, 7]]);
    }

    #[test]
    fn test_clockwise_rotation_of_t() {
        let shape = PieceKind::T.shape(PieceRotation::new(1));
        assert_eq!(tags(shape), vec![vec![6, 0], vec![6, 6], vec![6, 0]]);
    }

    #[test]
    fn test_counter_clockwise_rotation_of_l() {
        let shape = PieceKind::L
            .shape(PieceRotation::SPAWN)
            .rotated(RotationDirection::CounterClockwise);
        assert_eq!(tags(&shape), vec![vec![3, 3], vec![0, 3], vec![0, 3]]);
    }

    #[test]
    fn test_catalog_orientations_follow_rotation() {
        for kind in PieceKind::ALL {
            for index in 0..4 {
                let rotation = PieceRotation::new(index);
                let shape = kind.shape(rotation);
                let cw = kind.shape(rotation.rotated(RotationDirection::Clockwise));
                let ccw = kind.shape(rotation.rotated(RotationDirection::CounterClockwise));
                assert_eq!(shape.rotated(RotationDirection::Clockwise), *cw, "{kind:?}");
                assert_eq!(
                    shape.rotated(RotationDirection::CounterClockwise),
                    *ccw,
                    "{kind:?}"
                );
            }
        }
    }

    #[test]
    fn test_every_orientation_has_four_cells() {
        for kind in PieceKind::ALL {
            for index in 0..4 {
                let shape = kind.shape(PieceRotation::new(index));
                assert_eq!(shape.occupied_positions().count(), 4);
                assert!(
                    shape
                        .rows()
                        .flatten()
                        .all(|cell| cell.is_empty() || *cell == Cell::Piece(kind))
                );
            }
        }
    }

    #[test]
    fn test_spawn_is_centered() {
        assert_eq!(Piece::spawn(PieceKind::I, 12).position().x(), 4);
        assert_eq!(Piece::spawn(PieceKind::O, 12).position().x(), 5);
        assert_eq!(Piece::spawn(PieceKind::T, 12).position().x(), 5);
        assert_eq!(Piece::spawn(PieceKind::T, 10).position().x(), 4);
        assert_eq!(Piece::spawn(PieceKind::Z, 12).position().y(), 0);
    }

    #[test]
    fn test_occupied_positions_are_offset_by_position() {
        let piece = Piece::new(
            PieceKind::T,
            PieceRotation::SPAWN,
            PiecePosition::new(3, 7),
        );
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(4, 7), (3, 8), (4, 8), (5, 8)]);
    }

    #[test]
    fn test_rotation_wraps() {
        let rotation = PieceRotation::SPAWN.rotated(RotationDirection::CounterClockwise);
        assert_eq!(rotation.index(), 3);
        assert_eq!(rotation.rotated(RotationDirection::Clockwise), PieceRotation::SPAWN);
    }

    #[test]
    fn test_piece_kind_tag_and_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_tag(kind.tag()), Some(kind));
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_tag(0), None);
        assert_eq!(PieceKind::from_tag(8), None);
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_piece_kind_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&PieceKind::S).unwrap(), "\"S\"");
        let kind: PieceKind = serde_json::from_str("\"Z\"").unwrap();
        assert_eq!(kind, PieceKind::Z);
    }
}
