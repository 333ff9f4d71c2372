use blocktris_engine::PieceKind;
use blocktris_profile::Theme;
use ratatui::style::{Color, Style};

#[expect(clippy::cast_possible_truncation)]
const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Colours used to draw the play screen in one [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// In `PieceKind::ALL` order.
    pieces: [Color; PieceKind::LEN],
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub ghost: Color,
    pub border: Color,
    pub paused: Color,
    pub game_over: Color,
}

impl Palette {
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                pieces: [
                    rgb(0x0097a7),
                    rgb(0x1e88e5),
                    rgb(0xfb8c00),
                    rgb(0xf9a825),
                    rgb(0x43a047),
                    rgb(0x8e24aa),
                    rgb(0xe53935),
                ],
                background: rgb(0xf5f5f5),
                text: rgb(0x212121),
                dim: rgb(0xbdbdbd),
                ghost: rgb(0x757575),
                border: rgb(0x424242),
                paused: rgb(0xffd54f),
                game_over: rgb(0xe53935),
            },
            Theme::Dark => Self {
                pieces: [
                    rgb(0x4dd0e1),
                    rgb(0x64b5f6),
                    rgb(0xffb74d),
                    rgb(0xffd54f),
                    rgb(0x81c784),
                    rgb(0xba68c8),
                    rgb(0xe57373),
                ],
                background: rgb(0x121212),
                text: rgb(0xe0e0e0),
                dim: rgb(0x424242),
                ghost: rgb(0x9e9e9e),
                border: rgb(0x757575),
                paused: rgb(0xffd54f),
                game_over: rgb(0xe57373),
            },
            Theme::Neon => Self {
                pieces: [
                    rgb(0x00ffff),
                    rgb(0x1f51ff),
                    rgb(0xff9f00),
                    rgb(0xffff00),
                    rgb(0x39ff14),
                    rgb(0xff00ff),
                    rgb(0xff073a),
                ],
                background: rgb(0x000000),
                text: rgb(0xffffff),
                dim: rgb(0x333333),
                ghost: rgb(0x00ffff),
                border: rgb(0xff00ff),
                paused: rgb(0xffff00),
                game_over: rgb(0xff073a),
            },
            Theme::Pastel => Self {
                pieces: [
                    rgb(0xa0e7e5),
                    rgb(0xa7c7e7),
                    rgb(0xffd1a4),
                    rgb(0xfff1a8),
                    rgb(0xb4f8c8),
                    rgb(0xd7b8f3),
                    rgb(0xffaebc),
                ],
                background: rgb(0x2e2a36),
                text: rgb(0xf8f4ff),
                dim: rgb(0x514a5e),
                ghost: rgb(0xcfc6dd),
                border: rgb(0xd7b8f3),
                paused: rgb(0xfff1a8),
                game_over: rgb(0xffaebc),
            },
            Theme::Retro => Self {
                pieces: [
                    rgb(0x00ffff),
                    rgb(0x0000ff),
                    rgb(0xff7f00),
                    rgb(0xffff00),
                    rgb(0x00ff00),
                    rgb(0xff00ff),
                    rgb(0xff0000),
                ],
                background: rgb(0x000000),
                text: rgb(0xffffff),
                dim: rgb(0x7f7f7f),
                ghost: rgb(0xffffff),
                border: rgb(0xffffff),
                paused: rgb(0xffff00),
                game_over: rgb(0xff0000),
            },
            Theme::Vaporwave => Self {
                pieces: [
                    rgb(0x01cdfe),
                    rgb(0x4f6dff),
                    rgb(0xffa56b),
                    rgb(0xfffb96),
                    rgb(0x05ffa1),
                    rgb(0xb967ff),
                    rgb(0xff71ce),
                ],
                background: rgb(0x1a1033),
                text: rgb(0xfffb96),
                dim: rgb(0x3d2a66),
                ghost: rgb(0xff71ce),
                border: rgb(0x01cdfe),
                paused: rgb(0xfffb96),
                game_over: rgb(0xff71ce),
            },
            Theme::Mono => Self {
                pieces: [
                    rgb(0xffffff),
                    rgb(0xc6c6c6),
                    rgb(0xa0a0a0),
                    rgb(0xd9d9d9),
                    rgb(0x8c8c8c),
                    rgb(0xb3b3b3),
                    rgb(0xececec),
                ],
                background: rgb(0x000000),
                text: rgb(0xffffff),
                dim: rgb(0x404040),
                ghost: rgb(0x808080),
                border: rgb(0xffffff),
                paused: rgb(0xffffff),
                game_over: rgb(0xffffff),
            },
        }
    }

    #[must_use]
    pub fn piece(&self, kind: PieceKind) -> Color {
        self.pieces[usize::from(kind.tag()) - 1]
    }

    #[must_use]
    pub const fn default_style(&self) -> Style {
        Style::new().fg(self.text).bg(self.background)
    }

    #[must_use]
    pub fn piece_style(&self, kind: PieceKind) -> Style {
        let color = self.piece(kind);
        Style::new().fg(color).bg(color)
    }

    #[must_use]
    pub const fn empty_style(&self) -> Style {
        Style::new().fg(self.background).bg(self.background)
    }

    #[must_use]
    pub const fn empty_dot_style(&self) -> Style {
        Style::new().fg(self.dim).bg(self.background)
    }

    #[must_use]
    pub const fn ghost_style(&self) -> Style {
        Style::new().fg(self.ghost).bg(self.background)
    }

    #[must_use]
    pub const fn dim_style(&self) -> Style {
        Style::new().fg(self.dim).bg(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb() {
        assert_eq!(rgb(0x12ab_ef), Color::Rgb(0x12, 0xab, 0xef));
    }

    #[test]
    fn test_piece_colors_are_distinct_per_theme() {
        for theme in Theme::ALL {
            let palette = Palette::for_theme(theme);
            for (i, a) in PieceKind::ALL.iter().enumerate() {
                for b in &PieceKind::ALL[i + 1..] {
                    assert_ne!(palette.piece(*a), palette.piece(*b), "{theme}: {a:?} vs {b:?}");
                }
                assert_ne!(palette.piece(*a), palette.background, "{theme}: {a:?}");
            }
        }
    }

    #[test]
    fn test_retro_matches_classic_colors() {
        let palette = Palette::for_theme(Theme::Retro);
        assert_eq!(palette.piece(PieceKind::I), Color::Rgb(0, 255, 255));
        assert_eq!(palette.piece(PieceKind::T), Color::Rgb(255, 0, 255));
    }
}
