pub use self::{arena::*, piece::*, rotation::*};

pub(crate) mod arena;
pub(crate) mod piece;
pub(crate) mod rotation;
