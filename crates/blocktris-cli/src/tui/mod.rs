mod event_loop;
mod runner;

pub use self::runner::{App, Tui};
