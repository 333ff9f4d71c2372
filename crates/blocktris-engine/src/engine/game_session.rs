use std::time::Duration;

use tracing::{debug, info};

use crate::{
    HoldError, PieceCollisionError,
    core::{
        arena::Arena,
        piece::{Piece, PieceKind, RotationDirection},
    },
};

use super::{
    command::Command,
    config::GameConfig,
    event::GameEvent,
    game_field::GameField,
    game_stats::GameStats,
    piece_queue::{PieceQueue, PieceSeed, Randomizer},
};

/// Lifecycle of a [`GameSession`].
///
/// `Idle → Running → (Paused ⇄ Running) → Ended`; `Idle` and `Ended` are left
/// only through [`GameSession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Ended,
}

/// A single game: field, statistics, clocks and lifecycle state.
///
/// Time is supplied by the caller as a monotonic timestamp (`now`) on every
/// [`tick`](Self::tick). The session keeps its own game clock, which only
/// advances while running: the first tick after [`start`](Self::start) or a
/// resume only records the baseline.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blocktris_engine::{Command, GameConfig, GameSession, PieceKind, Randomizer};
///
/// let mut session = GameSession::new(GameConfig::default(), Randomizer::sequence([PieceKind::O]));
/// session.start();
///
/// session.advance(Duration::ZERO, [Command::MoveLeft]);
/// session.advance(Duration::from_secs(1), []);
///
/// assert_eq!(session.falling_piece().position().y(), 1);
/// assert!(session.state().is_running());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    field: GameField,
    stats: GameStats,
    state: SessionState,
    elapsed: Duration,
    drop_counter: Duration,
    last_tick: Option<Duration>,
    lock_started_at: Option<Duration>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates an idle session; call [`start`](Self::start) to begin playing.
    #[must_use]
    pub fn new(config: GameConfig, randomizer: Randomizer) -> Self {
        let arena = Arena::new(config.width(), config.height());
        Self {
            config,
            field: GameField::new(arena, PieceQueue::new(randomizer)),
            stats: GameStats::new(),
            state: SessionState::Idle,
            elapsed: Duration::ZERO,
            drop_counter: Duration::ZERO,
            last_tick: None,
            lock_started_at: None,
            events: vec![],
        }
    }

    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        Self::new(config, Randomizer::seven_bag(seed))
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut GameField {
        &mut self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Game time spent running since the last start.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        self.field.arena()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.field.ghost_piece()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.field.held_piece()
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.state.is_running() && self.field.can_hold()
    }

    /// Upcoming kinds, limited to the configured preview length.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.field.next_pieces().take(self.config.preview_len())
    }

    /// Returns whether the falling piece is grounded and waiting to lock.
    #[must_use]
    pub fn is_lock_pending(&self) -> bool {
        self.lock_started_at.is_some()
    }

    /// Takes the events emitted since the previous call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Resets arena, queue, hold, statistics and clocks, and starts running.
    pub fn start(&mut self) {
        self.field.reset();
        self.stats = GameStats::new();
        self.elapsed = Duration::ZERO;
        self.drop_counter = Duration::ZERO;
        self.last_tick = None;
        self.lock_started_at = None;
        self.events.clear();
        self.state = SessionState::Running;
        info!(
            width = self.config.width(),
            height = self.config.height(),
            "session started"
        );
    }

    pub fn pause(&mut self) {
        if self.state.is_running() {
            self.state = SessionState::Paused;
            self.last_tick = None;
            debug!(elapsed = ?self.elapsed, "session paused");
        }
    }

    /// Resumes a paused session; the next tick re-establishes the baseline so
    /// the paused wall-clock time is not credited.
    pub fn resume(&mut self) {
        if self.state.is_paused() {
            self.state = SessionState::Running;
            self.last_tick = None;
            debug!(elapsed = ?self.elapsed, "session resumed");
        }
    }

    /// Applies queued commands, then advances the clock to `now`.
    pub fn advance(&mut self, now: Duration, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.apply(command);
        }
        self.tick(now);
    }

    /// Applies a single command. Returns whether it changed the session.
    ///
    /// While paused only [`Command::Pause`] is accepted; idle and ended
    /// sessions ignore every command.
    pub fn apply(&mut self, command: Command) -> bool {
        match self.state {
            SessionState::Running => {}
            SessionState::Paused if command == Command::Pause => {
                self.resume();
                return true;
            }
            SessionState::Paused | SessionState::Idle | SessionState::Ended => return false,
        }

        match command {
            Command::MoveLeft => self.try_move_left().is_ok(),
            Command::MoveRight => self.try_move_right().is_ok(),
            Command::SoftDrop => self.try_soft_drop().is_ok(),
            Command::HardDrop => {
                self.hard_drop_and_complete();
                true
            }
            Command::RotateCw => self.try_rotate(RotationDirection::Clockwise).is_ok(),
            Command::Hold => self.try_hold().is_ok(),
            Command::Pause => {
                self.pause();
                true
            }
        }
    }

    /// Advances the game clock to `now` and runs gravity and lock delay.
    ///
    /// Does nothing unless the session is running.
    pub fn tick(&mut self, now: Duration) {
        if !self.state.is_running() {
            return;
        }
        let delta = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_tick = Some(now);
        self.elapsed += delta;
        self.drop_counter += delta;

        if self.drop_counter < self.stats.gravity_interval() {
            return;
        }
        if self.field.try_soft_drop().is_ok() {
            self.drop_counter = Duration::ZERO;
            self.lock_started_at = None;
            return;
        }
        let grounded_at = *self.lock_started_at.get_or_insert(self.elapsed);
        if self.elapsed - grounded_at >= self.config.lock_delay() {
            self.complete_piece_drop();
        }
    }

    fn ensure_running(&self) -> Result<(), PieceCollisionError> {
        if self.state.is_running() {
            Ok(())
        } else {
            Err(PieceCollisionError)
        }
    }

    fn on_piece_moved(&mut self) {
        self.lock_started_at = None;
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.ensure_running()?;
        self.field.try_move(-1)?;
        self.on_piece_moved();
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.ensure_running()?;
        self.field.try_move(1)?;
        self.on_piece_moved();
        Ok(())
    }

    /// Moves the piece down one row, awarding soft-drop points.
    ///
    /// A blocked soft drop does not lock the piece; it starts the lock delay.
    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.ensure_running()?;
        if let Err(e) = self.field.try_soft_drop() {
            if self.lock_started_at.is_none() {
                self.lock_started_at = Some(self.elapsed);
            }
            return Err(e);
        }
        self.on_piece_moved();
        self.stats.add_soft_drop(1);
        self.push_score_changed();
        Ok(())
    }

    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), PieceCollisionError> {
        self.ensure_running()?;
        self.field.try_rotate(direction)?;
        self.on_piece_moved();
        Ok(())
    }

    /// Holds the falling piece.
    ///
    /// If the piece brought in from the queue collides at spawn, the hold is
    /// applied and the session ends.
    pub fn try_hold(&mut self) -> Result<(), HoldError> {
        self.ensure_running().map_err(HoldError::PieceCollision)?;
        match self.field.try_hold() {
            Ok(()) => {}
            Err(HoldError::NewPieceCollision) => {
                self.on_piece_moved();
                self.end_game();
                return Ok(());
            }
            Err(e) => return Err(e),
        }
        self.drop_counter = Duration::ZERO;
        self.on_piece_moved();
        Ok(())
    }

    /// Drops the piece to its landing position and locks it immediately.
    pub fn hard_drop_and_complete(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let distance = self.field.hard_drop();
        if distance > 0 {
            self.stats.add_hard_drop(distance);
            self.push_score_changed();
        }
        self.complete_piece_drop();
    }

    fn push_score_changed(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            score: self.stats.score(),
        });
    }

    fn complete_piece_drop(&mut self) {
        let level_before = self.stats.level();
        let (cleared_lines, result) = self.field.complete_piece_drop();
        let points = self
            .stats
            .complete_piece_drop(cleared_lines, self.config.scoring());
        self.drop_counter = Duration::ZERO;
        self.lock_started_at = None;
        debug!(cleared_lines, points, "piece locked");

        if cleared_lines > 0 {
            self.events.push(GameEvent::LinesCleared {
                count: cleared_lines,
                total: self.stats.total_cleared_lines(),
            });
        }
        if points > 0 {
            self.push_score_changed();
        }
        if self.stats.level() > level_before {
            info!(level = self.stats.level(), "level up");
            self.events.push(GameEvent::LevelUp {
                level: self.stats.level(),
            });
        }

        if result.is_err() {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.state = SessionState::Ended;
        info!(
            score = self.stats.score(),
            level = self.stats.level(),
            lines = self.stats.total_cleared_lines(),
            "game over"
        );
        self.events.push(GameEvent::GameOver {
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::arena::Cell;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn running(width: u16, height: u16, pieces: &[PieceKind]) -> GameSession {
        let config = GameConfig::new(width, height).unwrap();
        let mut session = GameSession::new(config, Randomizer::sequence(pieces.iter().copied()));
        session.start();
        session
    }

    #[test]
    fn test_idle_session_ignores_commands_and_ticks() {
        let mut session = GameSession::new(GameConfig::default(), Randomizer::sequence([PieceKind::T]));
        assert!(session.state().is_idle());
        assert!(!session.apply(Command::MoveLeft));
        session.tick(ms(0));
        session.tick(ms(5000));
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.falling_piece().position().y(), 0);
    }

    #[test]
    fn test_gravity_follows_interval() {
        let mut session = running(12, 20, &[PieceKind::T]);
        session.tick(ms(100));
        session.tick(ms(1099));
        assert_eq!(session.falling_piece().position().y(), 0);
        session.tick(ms(1100));
        assert_eq!(session.falling_piece().position().y(), 1);
        assert_eq!(session.elapsed(), ms(1000));
        assert_eq!(session.stats().score(), 0);
    }

    #[test]
    fn test_lock_delay_after_grounding() {
        let mut session = running(12, 4, &[PieceKind::O]);
        session.tick(ms(0));
        session.tick(ms(1000));
        session.tick(ms(2000));
        assert_eq!(session.falling_piece().position().y(), 2);
        assert!(!session.is_lock_pending());

        session.tick(ms(3000));
        assert!(session.is_lock_pending());
        session.tick(ms(3499));
        assert_eq!(session.stats().completed_pieces(), 0);
        session.tick(ms(3500));
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.falling_piece().position().y(), 0);
        assert!(!session.is_lock_pending());
    }

    #[test]
    fn test_successful_move_resets_lock_delay() {
        let mut session = running(12, 4, &[PieceKind::O]);
        session.tick(ms(0));
        session.tick(ms(1000));
        session.tick(ms(2000));
        session.tick(ms(3000));
        assert!(session.is_lock_pending());

        session.advance(ms(3400), [Command::MoveLeft]);
        assert!(session.is_lock_pending());
        session.tick(ms(3899));
        assert_eq!(session.stats().completed_pieces(), 0);
        session.tick(ms(3900));
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_blocked_soft_drop_starts_lock_delay_without_locking() {
        let mut session = running(12, 2, &[PieceKind::O]);
        assert!(!session.apply(Command::SoftDrop));
        assert!(session.is_lock_pending());
        assert_eq!(session.stats().completed_pieces(), 0);
        assert_eq!(session.stats().score(), 0);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut session = running(12, 20, &[PieceKind::T]);
        session.tick(ms(0));
        assert!(session.apply(Command::Pause));
        assert!(session.state().is_paused());
        assert!(!session.apply(Command::MoveLeft));
        session.tick(ms(5000));
        assert_eq!(session.elapsed(), Duration::ZERO);

        assert!(session.apply(Command::Pause));
        assert!(session.state().is_running());
        session.tick(ms(6000));
        session.tick(ms(6999));
        assert_eq!(session.falling_piece().position().y(), 0);
        session.tick(ms(7000));
        assert_eq!(session.falling_piece().position().y(), 1);
        assert_eq!(session.elapsed(), ms(1000));
    }

    #[test]
    fn test_soft_drop_awards_one_point_per_cell() {
        let mut session = running(12, 20, &[PieceKind::T]);
        assert!(session.apply(Command::SoftDrop));
        assert!(session.apply(Command::SoftDrop));
        assert_eq!(session.stats().score(), 2);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged { score: 1 },
                GameEvent::ScoreChanged { score: 2 }
            ]
        );
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn test_hold_once_per_piece() {
        let mut session = running(12, 20, &[PieceKind::T, PieceKind::I]);
        assert!(session.can_hold());
        assert!(session.apply(Command::Hold));
        assert_eq!(session.held_piece(), Some(PieceKind::T));
        assert_eq!(session.falling_piece().kind(), PieceKind::I);
        assert!(!session.can_hold());
        assert!(!session.apply(Command::Hold));

        assert!(session.apply(Command::HardDrop));
        assert!(session.can_hold());
    }

    #[test]
    fn test_hold_into_blocked_spawn_ends_session() {
        let mut session = running(12, 4, &[PieceKind::I, PieceKind::T]);
        session
            .field_mut()
            .arena_mut()
            .set_cell(6, 1, Cell::Piece(PieceKind::Z));

        assert!(session.apply(Command::Hold));
        assert!(session.state().is_ended());
        assert_eq!(session.held_piece(), Some(PieceKind::I));
        assert_eq!(session.falling_piece().kind(), PieceKind::T);
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            vec![GameEvent::GameOver {
                score: 0,
                level: 1,
                lines: 0
            }]
        );
        assert!(!session.apply(Command::MoveLeft));
    }

    #[test]
    fn test_o_pieces_top_out_after_ten_drops() {
        let mut session = running(12, 20, &[PieceKind::O]);
        for _ in 0..9 {
            assert!(session.apply(Command::HardDrop));
            assert!(session.state().is_running());
        }
        assert!(session.apply(Command::HardDrop));
        assert!(session.state().is_ended());
        assert_eq!(session.stats().completed_pieces(), 10);
        assert_eq!(session.stats().score(), 180);
        assert_eq!(
            session.drain_events().last(),
            Some(GameEvent::GameOver {
                score: 180,
                level: 1,
                lines: 0
            })
        );

        assert!(!session.apply(Command::MoveLeft));
        session.start();
        assert!(session.state().is_running());
        assert!(session.arena().is_empty());
        assert_eq!(session.stats().score(), 0);
    }

    #[test]
    fn test_vertical_i_completes_single_row() {
        let mut session = running(12, 20, &[PieceKind::I]);
        let arena = session.field_mut().arena_mut();
        for x in (0..12).filter(|&x| x != 4) {
            arena.set_cell(x, 19, Cell::Piece(PieceKind::Z));
        }

        assert!(session.apply(Command::RotateCw));
        assert_eq!(session.falling_piece().position().x(), 4);
        assert!(session.apply(Command::HardDrop));

        assert_eq!(session.stats().score(), 132);
        assert_eq!(session.stats().total_cleared_lines(), 1);
        for y in 17..20 {
            assert_eq!(session.arena().cell(4, y), Some(Cell::Piece(PieceKind::I)));
        }
        assert_eq!(session.arena().cell(4, 16), Some(Cell::Empty));
        assert_eq!(session.arena().cell(0, 19), Some(Cell::Empty));

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged { score: 32 },
                GameEvent::LinesCleared { count: 1, total: 1 },
                GameEvent::ScoreChanged { score: 132 },
            ]
        );
    }

    #[test]
    fn test_level_up_speeds_up_gravity() {
        let mut session = running(4, 20, &[PieceKind::I]);
        for _ in 0..10 {
            assert!(session.apply(Command::HardDrop));
        }
        assert_eq!(session.stats().total_cleared_lines(), 10);
        assert_eq!(session.stats().level(), 2);
        assert_eq!(session.stats().gravity_interval(), ms(820));
        assert!(
            session
                .drain_events()
                .any(|event| event == GameEvent::LevelUp { level: 2 })
        );
    }
}
