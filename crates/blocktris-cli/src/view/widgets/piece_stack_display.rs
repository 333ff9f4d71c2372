use std::iter;

use blocktris_engine::PieceKind;
use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Buffer, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::{
    Palette,
    widgets::{BlockDisplay, PieceDisplay},
};

#[derive(Debug)]
pub struct PieceStackDisplay<'a> {
    pieces: Vec<PieceKind>,
    slots: usize,
    palette: &'a Palette,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceStackDisplay<'a> {
    pub fn new<I>(pieces: I, palette: &'a Palette) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let pieces: Vec<_> = pieces.into_iter().collect();
        Self {
            slots: pieces.len(),
            pieces,
            palette,
            block: None,
        }
    }

    /// Reserves room for at least `slots` pieces.
    pub fn slots(self, slots: usize) -> Self {
        Self {
            slots: slots.max(self.pieces.len()),
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
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let num_pieces = u16::try_from(self.slots).unwrap_or(u16::MAX);
        let padding = num_pieces.saturating_sub(1);
        2 * BlockDisplay::height() * num_pieces
            + padding
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let layout = Layout::vertical(
            (0..self.slots).map(|_| Constraint::Length(2 * BlockDisplay::height())),
        )
        .spacing(1);
        let cells = area.layout_vec(&layout);

        for (cell, piece) in iter::zip(cells, &self.pieces) {
            PieceDisplay::new(self.palette).piece(*piece).render(cell, buf);
        }
    }
}
