use blocktris_profile::KeyBindings;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

/// Help line listing `key action` pairs.
#[derive(Debug, Default)]
pub struct KeyBindingDisplay<'a> {
    items: Vec<(String, &'a str)>,
    key_style: Style,
    description_style: Style,
    separator_style: Style,
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every command with its bound key, in command order.
    pub fn bindings(mut self, bindings: &KeyBindings) -> Self {
        self.items.extend(
            bindings
                .iter()
                .map(|(command, key)| (key.to_owned(), command.label())),
        );
        self
    }

    pub fn item(mut self, key: &str, description: &'a str) -> Self {
        self.items.push((key.to_owned(), description));
        self
    }

    pub fn styles(self, key: Style, description: Style, separator: Style) -> Self {
        Self {
            key_style: key,
            description_style: description,
            separator_style: separator,
            ..self
        }
    }

    fn line(&self) -> Line<'_> {
        let mut spans = vec![];
        for (i, (key, desc)) in self.items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", self.separator_style));
            }
            spans.push(Span::styled(key.as_str(), self.key_style));
            spans.push(Span::from(" "));
            spans.push(Span::styled(*desc, self.description_style));
        }
        Line::from(spans).centered()
    }
}

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.line().render(area, buf);
    }
}
