//! Game rules and session state built on top of [`core`](crate::core).
//!
//! - [`GameField`] - per-piece state (arena, falling piece, queue, hold)
//! - [`GameSession`] - clocked session with lifecycle, commands and events
//! - [`GameStats`] - score, lines, level and gravity speed
//! - [`GameConfig`] / [`ScoringPolicy`] - session parameters
//! - [`PieceQueue`] / [`Randomizer`] / [`PieceSeed`] - upcoming pieces
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] and [`start`](GameSession::start) it
//! 2. Feed player [`Command`]s and clock ticks through
//!    [`advance`](GameSession::advance)
//! 3. Gravity moves the piece down; once grounded for the lock delay (or on
//!    hard drop) it locks, full rows clear and the next piece spawns
//! 4. The session ends when a new piece cannot spawn
//!
//! Renderers read the session; persistence reacts to the [`GameEvent`]s it
//! emits.

pub use self::{
    command::*, config::*, event::*, game_field::*, game_session::*, game_stats::*,
    piece_queue::*,
};

mod command;
mod config;
mod event;
mod game_field;
mod game_session;
mod game_stats;
mod piece_queue;
