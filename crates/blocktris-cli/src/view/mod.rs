pub use self::palette::Palette;

mod palette;
pub mod widgets;
