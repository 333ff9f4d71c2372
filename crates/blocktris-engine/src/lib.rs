pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("piece colliding when holding piece")]
    PieceCollision(PieceCollisionError),
    #[display("hold already used for this piece")]
    HoldAlreadyUsed,
    /// The piece was stowed but its replacement collides at spawn; the game
    /// is over.
    #[display("new piece collides at spawn after hold")]
    NewPieceCollision,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CompletePieceDropError {
    #[display("new piece collides at spawn")]
    NewPieceCollision,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("arena {width}x{height} is smaller than the 4x2 minimum")]
    ArenaTooSmall { width: u16, height: u16 },
    #[display("preview length {_0} is out of range")]
    PreviewLength(#[error(not(source))] usize),
}
