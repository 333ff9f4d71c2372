use blocktris_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Padding, Widget},
};

use crate::view::{
    Palette,
    widgets::{BoardDisplay, PieceDisplay, PieceStackDisplay, PopupDisplay, SessionStatsDisplay},
};

/// Message box shown over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay<'a> {
    None,
    Start,
    Paused,
    GameOver { score: u64 },
    NameEntry { score: u64, name: &'a str },
}

#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    palette: &'a Palette,
    high_score: u64,
    overlay: Overlay<'a>,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, palette: &'a Palette) -> Self {
        Self {
            session,
            palette,
            high_score: 0,
            overlay: Overlay::None,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn high_score(self, high_score: u64) -> Self {
        Self { high_score, ..self }
    }

    pub fn overlay(self, overlay: Overlay<'a>) -> Self {
        Self { overlay, ..self }
    }

    fn popup(&self) -> Option<PopupDisplay<'a>> {
        let palette = self.palette;
        let popup = match self.overlay {
            Overlay::None => return None,
            Overlay::Start => PopupDisplay::new(
                ["BLOCKTRIS", "", "Press Enter to start"],
                Style::new().fg(palette.background).bg(palette.border),
            ),
            Overlay::Paused => PopupDisplay::new(
                ["PAUSED"],
                Style::new().fg(palette.background).bg(palette.paused),
            ),
            Overlay::GameOver { score } => PopupDisplay::new(
                [
                    Line::from("GAME OVER!!"),
                    Line::from(format!("Score: {score}")),
                    Line::from(""),
                    Line::from("Press Enter to play again"),
                ],
                Style::new().fg(palette.text).bg(palette.game_over),
            ),
            Overlay::NameEntry { score, name } => PopupDisplay::new(
                [
                    Line::from(name_entry_title(score, self.high_score)),
                    Line::from(format!("Score: {score}")),
                    Line::from(""),
                    Line::from(format!("Name: {name}_")),
                    Line::from("Enter: save | Esc: skip"),
                ],
                Style::new().fg(palette.text).bg(palette.game_over),
            ),
        };
        Some(popup)
    }
}

fn name_entry_title(score: u64, high_score: u64) -> &'static str {
    if score >= high_score {
        "NEW HIGH SCORE!"
    } else {
        "NEW LEADERBOARD ENTRY!"
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let palette = self.palette;
        let style = palette.default_style();
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.state() {
            SessionState::Idle => palette.dim,
            SessionState::Running => palette.border,
            SessionState::Paused => palette.paused,
            SessionState::Ended => palette.game_over,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style)
        };

        let in_play = !self.session.state().is_idle();
        let game_board = {
            let widget = BoardDisplay::new(self.session.arena(), palette)
                .block(Block::bordered().border_style(border_style).style(style));
            if in_play {
                widget
                    .ghost(self.session.ghost_piece())
                    .falling_piece(self.session.falling_piece())
            } else {
                widget
            }
        };
        let hold_panel = {
            let display = PieceDisplay::new(palette).block(panel("HOLD"));
            match self.session.held_piece() {
                Some(piece) if in_play => display
                    .piece(piece)
                    .dimmed(self.session.state().is_running() && !self.session.can_hold()),
                _ => display,
            }
        };
        let next_pieces: Vec<_> = if in_play {
            self.session.next_pieces().collect()
        } else {
            vec![]
        };
        let piece_stack = PieceStackDisplay::new(next_pieces, palette)
            .slots(self.session.config().preview_len())
            .block(panel("NEXT"));
        let session_stats = SessionStatsDisplay::new(self.session, self.high_score)
            .style(style)
            .block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), session_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(session_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let [piece_stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        hold_panel.render(hold_area, buf);
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        piece_stack.render(piece_stack_area, buf);

        if let Some(popup) = self.popup() {
            popup.render(board_area, buf);
        }
    }
}
