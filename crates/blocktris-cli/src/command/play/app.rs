use std::time::{Duration, Instant};

use blocktris_engine::{Command, GameEvent, GameSession, SessionState};
use blocktris_profile::{KeyBindings, KeyValueStore, LeaderboardEntry, Profile, StoreError};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
};
use tracing::{error, info};

use crate::{
    input::KeyMap,
    tui::{App, Tui},
    view::{
        Palette,
        widgets::{KeyBindingDisplay, Overlay, SessionDisplay},
    },
};

const TICK_INTERVAL: Duration = Duration::from_millis(16);
const MAX_NAME_LEN: usize = 16;

/// Leaderboard name being typed after a qualifying game.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameEntry {
    score: u64,
    level: usize,
    name: String,
}

#[derive(Debug)]
pub struct PlayApp<S> {
    session: GameSession,
    profile: Profile<S>,
    bindings: KeyBindings,
    key_map: KeyMap,
    palette: Palette,
    clock: Instant,
    pending: Vec<Command>,
    high_score: u64,
    name_entry: Option<NameEntry>,
    is_exiting: bool,
}

impl<S> PlayApp<S>
where
    S: KeyValueStore,
{
    pub fn new(session: GameSession, profile: Profile<S>) -> Result<Self, StoreError> {
        let settings = profile.settings()?;
        let high_score = profile.high_score()?;
        Ok(Self {
            session,
            key_map: KeyMap::new(&settings.bindings),
            bindings: settings.bindings,
            palette: Palette::for_theme(settings.theme),
            profile,
            clock: Instant::now(),
            pending: vec![],
            high_score,
            name_entry: None,
            is_exiting: false,
        })
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Ticks run only while the session is running.
    fn sync_ticks(&self, tui: &mut Tui) {
        let running = self.session.state().is_running();
        if running != tui.is_ticking() {
            tui.set_tick_interval(running.then_some(TICK_INTERVAL));
        }
    }

    fn start(&mut self) {
        self.pending.clear();
        self.name_entry = None;
        self.session.start();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.is_exiting = true;
            return;
        }
        if self.name_entry.is_some() {
            self.handle_name_key(key);
            return;
        }

        let state = self.session.state();
        if key.code == KeyCode::Enter && (state.is_idle() || state.is_ended()) {
            self.start();
            return;
        }
        match self.key_map.command_for(&key) {
            // Not queued: no ticks arrive while paused.
            Some(Command::Pause) => {
                for command in self.pending.drain(..) {
                    self.session.apply(command);
                }
                self.session.apply(Command::Pause);
                self.process_events();
            }
            Some(command) if state.is_running() => self.pending.push(command),
            Some(_) => {}
            None if key.code == KeyCode::Char('q') => self.is_exiting = true,
            None => {}
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_name(),
            KeyCode::Esc => self.name_entry = None,
            KeyCode::Backspace => {
                if let Some(entry) = &mut self.name_entry {
                    entry.name.pop();
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                if let Some(entry) = &mut self.name_entry
                    && entry.name.chars().count() < MAX_NAME_LEN
                {
                    entry.name.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_name(&mut self) {
        let Some(NameEntry { score, level, name }) = self.name_entry.take() else {
            return;
        };
        let date = chrono::Local::now().date_naive();
        let entry = LeaderboardEntry::new(&name, score, level, date);
        match self.profile.submit_score(entry) {
            Ok(Some(rank)) => info!(rank = rank + 1, score, "leaderboard entry saved"),
            Ok(None) => {}
            Err(e) => error!(error = %e, "failed to save leaderboard entry"),
        }
    }

    fn process_events(&mut self) {
        let events: Vec<_> = self.session.drain_events().collect();
        for event in events {
            match event {
                GameEvent::ScoreChanged { score } if score > self.high_score => {
                    self.high_score = score;
                    if let Err(e) = self.profile.record_high_score(score) {
                        error!(error = %e, "failed to save high score");
                    }
                }
                GameEvent::GameOver { score, level, lines } => {
                    info!(score, level, lines, "game over");
                    self.offer_leaderboard(score, level);
                }
                GameEvent::ScoreChanged { .. }
                | GameEvent::LinesCleared { .. }
                | GameEvent::LevelUp { .. } => {}
            }
        }
    }

    fn offer_leaderboard(&mut self, score: u64, level: usize) {
        if score == 0 {
            return;
        }
        match self.profile.leaderboard() {
            Ok(board) if board.qualifies(score) => {
                self.name_entry = Some(NameEntry {
                    score,
                    level,
                    name: String::new(),
                });
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "failed to load leaderboard"),
        }
    }

    fn overlay(&self) -> Overlay<'_> {
        if let Some(entry) = &self.name_entry {
            return Overlay::NameEntry {
                score: entry.score,
                name: &entry.name,
            };
        }
        match self.session.state() {
            SessionState::Idle => Overlay::Start,
            SessionState::Running => Overlay::None,
            SessionState::Paused => Overlay::Paused,
            SessionState::Ended => Overlay::GameOver {
                score: self.session.stats().score(),
            },
        }
    }

    fn help_line(&self) -> KeyBindingDisplay<'_> {
        let palette = &self.palette;
        let help = KeyBindingDisplay::new().styles(
            Style::new().fg(palette.border),
            Style::new().fg(palette.text),
            palette.dim_style(),
        );
        if self.name_entry.is_some() {
            return help.item("Enter", "Save").item("Esc", "Skip");
        }
        match self.session.state() {
            SessionState::Running => help.bindings(&self.bindings).item("q", "Quit"),
            SessionState::Paused => help
                .item(self.bindings.key(Command::Pause), "Resume")
                .item("q", "Quit"),
            SessionState::Idle | SessionState::Ended => {
                help.item("Enter", "Start").item("q", "Quit")
            }
        }
    }
}

impl<S> App for PlayApp<S>
where
    S: KeyValueStore,
{
    fn init(&mut self, tui: &mut Tui) {
        self.sync_ticks(tui);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_press_event() {
            self.handle_key(key);
            self.sync_ticks(tui);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, &self.palette)
            .high_score(self.high_score)
            .overlay(self.overlay());

        let [main_area, help_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(
            Block::new().style(self.palette.default_style()),
            frame.area(),
        );
        frame.render_widget(session_display, main_area);
        frame.render_widget(self.help_line(), help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        let now = self.now();
        self.session.advance(now, self.pending.drain(..));
        self.process_events();
        self.sync_ticks(tui);
    }
}
