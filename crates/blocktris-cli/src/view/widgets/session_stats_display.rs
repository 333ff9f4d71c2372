use std::{iter, time::Duration};

use blocktris_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

pub struct SessionStatsDisplay<'a> {
    session: &'a GameSession,
    high_score: u64,
    style: Style,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a GameSession, high_score: u64) -> Self {
        Self {
            session,
            high_score,
            style: Style::new(),
            block: None,
        }
    }

    pub fn style(self, style: Style) -> Self {
        Self { style, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = &'static dyn Fn(&SessionStatsDisplay<'_>) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

fn format_time(dur: Duration) -> String {
    format!(
        "{:0}:{:0>2}.{:0>2}",
        dur.as_secs() / 60,
        dur.as_secs() % 60,
        dur.subsec_millis() / 10
    )
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|d| d.session.stats().score().to_string()),
    Row::FullLabel("HIGH SCORE:"),
    Row::FullValue(&|d| d.high_score.max(d.session.stats().score()).to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|d| format_time(d.session.elapsed())),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|d| d.session.stats().level().to_string()),
    Row::LabelValue("LINES:", &|d| {
        d.session.stats().total_cleared_lines().to_string()
    }),
    Row::LabelValue("PIECES:", &|d| d.session.stats().completed_pieces().to_string()),
    Row::LabelValue("COMBO:", &|d| match d.session.stats().combo() {
        Some(combo) if combo > 0 => combo.to_string(),
        _ => "-".to_owned(),
    }),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|d| {
        d.session.stats().line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|d| {
        d.session.stats().line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|d| {
        d.session.stats().line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("TETRIS:", &|d| {
        d.session.stats().line_cleared_counter()[4].to_string()
    }),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = self.style;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
