use std::iter;

use blocktris_engine::{Arena, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::{
    Palette,
    widgets::{BlockDisplay, Tile},
};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    arena: &'a Arena,
    palette: &'a Palette,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(arena: &'a Arena, palette: &'a Palette) -> Self {
        Self {
            arena,
            palette,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        self.arena.width() * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.arena.height() * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Arena cells with the ghost and the falling piece overlaid, row by row.
    fn tiles(&self) -> Vec<Tile> {
        let width = usize::from(self.arena.width());
        let mut tiles: Vec<Tile> = self
            .arena
            .rows()
            .flatten()
            .map(|cell| Tile::from(*cell))
            .collect();
        let mut overlay = |piece: Piece, tile: Tile| {
            for (x, y) in piece.occupied_positions() {
                // Rows above the arena are not drawn.
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if x < width
                    && let Some(slot) = tiles.get_mut(y * width + x)
                {
                    *slot = tile;
                }
            }
        };
        if let Some(ghost) = self.ghost {
            overlay(ghost, Tile::Ghost);
        }
        if let Some(piece) = self.falling_piece {
            overlay(piece, Tile::Piece(piece.kind()));
        }
        tiles
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.arena.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.arena.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .flat_map(|row| row.layout_vec(&horizontal));

        for (grid_cell, tile) in iter::zip(grid_cells, self.tiles()) {
            BlockDisplay::from_tile(tile, self.palette, true).render(grid_cell, buf);
        }
    }
}
