use super::piece::{Piece, PieceKind};

/// A single cell of the arena or of a piece shape.
///
/// The numeric [`tag`](Cell::tag) is `0` for empty cells and `1..=7` for
/// piece cells, which renderers use as a colour index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked (or falling) cell of a specific piece kind.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.tag(),
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        if tag == 0 {
            return Some(Cell::Empty);
        }
        match PieceKind::from_tag(tag) {
            Some(kind) => Some(Cell::Piece(kind)),
            None => None,
        }
    }
}

/// The playfield: a fixed-size grid of locked cells.
///
/// Cells are stored row-major with row 0 at the top. The dimensions are fixed
/// at creation; only the contents change, and only through
/// [`fill_piece`](Arena::fill_piece) and [`clear_lines`](Arena::clear_lines).
///
/// There is no top boundary: piece cells above row 0 never collide, so a
/// piece may rotate partially out of the top of the arena.
///
/// # Example
///
/// ```
/// use blocktris_engine::{Arena, Piece, PieceKind};
///
/// let mut arena = Arena::new(12, 20);
/// let piece = Piece::spawn(PieceKind::O, arena.width());
/// let landed = piece.simulate_drop_position(&arena);
///
/// arena.fill_piece(&landed);
/// assert!(arena.is_colliding(&piece.shifted(0, 18)));
/// assert_eq!(arena.clear_lines(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Arena {
    pub const MIN_WIDTH: u16 = 4;
    pub const MIN_HEIGHT: u16 = 2;

    /// Creates an empty arena.
    ///
    /// # Panics
    ///
    /// Panics if the arena is smaller than [`MIN_WIDTH`](Self::MIN_WIDTH) ×
    /// [`MIN_HEIGHT`](Self::MIN_HEIGHT).
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        assert!(
            width >= Self::MIN_WIDTH && height >= Self::MIN_HEIGHT,
            "arena too small: {width}x{height}"
        );
        let len = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::Empty; len],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    fn row_len(&self) -> usize {
        usize::from(self.width)
    }

    /// Returns the cell at `(x, y)`, or `None` outside the arena.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.row_len() {
            return None;
        }
        self.cells.get(y * self.row_len() + x).copied()
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.row_len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// Returns whether any occupied cell of `piece` overlaps a locked cell or
    /// lies left of, right of, or below the arena.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece
            .occupied_positions()
            .any(|(x, y)| self.is_blocked(x, y))
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        let Ok(x) = usize::try_from(x) else {
            return true;
        };
        if x >= self.row_len() {
            return true;
        }
        let Ok(y) = usize::try_from(y) else {
            return false;
        };
        if y >= usize::from(self.height) {
            return true;
        }
        !self.cells[y * self.row_len() + x].is_empty()
    }

    /// Writes the piece's cells into the arena.
    ///
    /// Cells outside the arena (above the top row) are discarded. Returns the
    /// number of discarded cells.
    pub fn fill_piece(&mut self, piece: &Piece) -> usize {
        let cell = Cell::Piece(piece.kind());
        let mut discarded = 0;
        for (x, y) in piece.occupied_positions() {
            match (usize::try_from(x), usize::try_from(y)) {
                (Ok(x), Ok(y)) if x < self.row_len() && y < usize::from(self.height) => {
                    let width = self.row_len();
                    self.cells[y * width + x] = cell;
                }
                _ => discarded += 1,
            }
        }
        discarded
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned bottom to top; each surviving row moves down by the
    /// number of full rows found below it, and the vacated rows at the top are
    /// emptied.
    pub fn clear_lines(&mut self) -> usize {
        let width = self.row_len();
        let mut count = 0;
        for y in (0..usize::from(self.height)).rev() {
            let start = y * width;
            if self.cells[start..start + width]
                .iter()
                .all(|cell| !cell.is_empty())
            {
                count += 1;
                continue;
            }
            if count > 0 {
                self.cells
                    .copy_within(start..start + width, start + count * width);
            }
        }
        self.cells[..count * width].fill(Cell::Empty);
        count
    }
}

#[cfg(test)]
impl Arena {
    /// Sets a single cell; coordinates must be inside the arena.
    pub(crate) fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(x < self.row_len(), "column {x} out of range");
        let width = self.row_len();
        self.cells[y * width + x] = cell;
    }

    /// Builds an arena from text rows: `.` is empty, a piece letter is a locked cell.
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let height = u16::try_from(rows.len()).unwrap();
        let width = u16::try_from(rows[0].len()).unwrap();
        let mut arena = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), usize::from(width));
            for (x, c) in row.chars().enumerate() {
                if c != '.' {
                    arena.set_cell(x, y, Cell::Piece(PieceKind::from_char(c).unwrap()));
                }
            }
        }
        arena
    }

    pub(crate) fn to_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => '.',
                        Cell::Piece(kind) => kind.as_char(),
                    })
                    .collect()
            })
            .collect()
    }
}
