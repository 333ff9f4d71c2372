/// Notifications emitted by a [`GameSession`](super::GameSession).
///
/// Events are buffered in order and handed out by
/// [`GameSession::drain_events`](super::GameSession::drain_events); the
/// session never reacts to them itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    LinesCleared { count: usize, total: usize },
    LevelUp { level: usize },
    GameOver { score: u64, level: usize, lines: usize },
}
