use blocktris_engine::{PieceKind, PieceRotation};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::{
    Palette,
    widgets::{BlockDisplay, Tile},
};

#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    palette: &'a Palette,
    dimmed: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self {
            piece: None,
            palette,
            dimmed: false,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    /// Draws the piece as a ghost, e.g. a held piece that cannot be swapped in.
    pub fn dimmed(self, dimmed: bool) -> Self {
        Self { dimmed, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.shape(PieceRotation::SPAWN);
        let (w, h) = (shape.width(), shape.height());
        let piece_area = area.centered(
            Constraint::Length(u16::try_from(w).unwrap_or(0) * BlockDisplay::width()),
            Constraint::Length(u16::try_from(h).unwrap_or(0) * BlockDisplay::height()),
        );

        let col_constraints = (0..w).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..h).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied = if self.dimmed {
            Tile::Ghost
        } else {
            Tile::Piece(piece)
        };
        let occupied_block = BlockDisplay::from_tile(occupied, self.palette, false);
        let empty_block = BlockDisplay::from_tile(Tile::Empty, self.palette, false);

        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if shape.cell(x, y).is_empty() {
                    Widget::render(&empty_block, grid_cell, buf);
                } else {
                    Widget::render(&occupied_block, grid_cell, buf);
                }
            }
        }
    }
}
