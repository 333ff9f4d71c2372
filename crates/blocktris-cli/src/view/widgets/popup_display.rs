use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Widget},
};

/// Centered message box drawn over another widget.
#[derive(Debug)]
pub struct PopupDisplay<'a> {
    text: Text<'a>,
    style: Style,
}

impl<'a> PopupDisplay<'a> {
    pub fn new<I>(lines: I, style: Style) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Line<'a>>,
    {
        Self {
            text: Text::from_iter(lines).style(style).centered(),
            style,
        }
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.text.height()).unwrap_or(u16::MAX) + 2
    }
}

impl Widget for PopupDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block = Block::new().style(self.style);
        let area = area.centered_vertically(Constraint::Length(self.height()));
        let inner = block.inner(area);
        let text_height = u16::try_from(self.text.height()).unwrap_or(u16::MAX);
        Clear.render(area, buf);
        block.render(area, buf);
        self.text
            .render(inner.centered_vertically(Constraint::Length(text_height)), buf);
    }
}
