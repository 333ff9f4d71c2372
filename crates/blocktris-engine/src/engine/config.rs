use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::arena::Arena, engine::piece_queue::PieceQueue};

/// Optional scoring bonuses layered on top of the base line-clear points.
///
/// Both are disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Consecutive line-clearing locks add `50 × chain × level`.
    pub combo: bool,
    /// A 4-line clear right after another 4-line clear scores 1.5× base points.
    pub back_to_back: bool,
}

/// Static parameters of a game session.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blocktris_engine::{GameConfig, ScoringPolicy};
///
/// let config = GameConfig::new(10, 22)?.with_scoring(ScoringPolicy {
///     combo: true,
///     back_to_back: false,
/// });
/// assert_eq!(config.lock_delay(), Duration::from_millis(500));
/// assert!(GameConfig::new(3, 20).is_err());
/// # Ok::<(), blocktris_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    width: u16,
    height: u16,
    lock_delay: Duration,
    preview_len: usize,
    scoring: ScoringPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            lock_delay: Self::DEFAULT_LOCK_DELAY,
            preview_len: PieceQueue::MIN_LEN,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl GameConfig {
    pub const DEFAULT_WIDTH: u16 = 12;
    pub const DEFAULT_HEIGHT: u16 = 20;
    pub const DEFAULT_LOCK_DELAY: Duration = Duration::from_millis(500);

    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width < Arena::MIN_WIDTH || height < Arena::MIN_HEIGHT {
            return Err(ConfigError::ArenaTooSmall { width, height });
        }
        Ok(Self {
            width,
            height,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_scoring(self, scoring: ScoringPolicy) -> Self {
        Self { scoring, ..self }
    }

    /// Sets how many upcoming pieces the session exposes (1 to
    /// [`PieceQueue::MIN_LEN`]).
    pub fn with_preview_len(self, preview_len: usize) -> Result<Self, ConfigError> {
        if !(1..=PieceQueue::MIN_LEN).contains(&preview_len) {
            return Err(ConfigError::PreviewLength(preview_len));
        }
        Ok(Self {
            preview_len,
            ..self
        })
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub const fn lock_delay(&self) -> Duration {
        self.lock_delay
    }

    #[must_use]
    pub const fn preview_len(&self) -> usize {
        self.preview_len
    }

    #[must_use]
    pub const fn scoring(&self) -> ScoringPolicy {
        self.scoring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!((config.width(), config.height()), (12, 20));
        assert_eq!(config.lock_delay(), Duration::from_millis(500));
        assert_eq!(config.preview_len(), 5);
        assert_eq!(config.scoring(), ScoringPolicy::default());
    }

    #[test]
    fn test_minimum_arena_size() {
        assert!(GameConfig::new(4, 2).is_ok());
        assert!(matches!(
            GameConfig::new(4, 1),
            Err(ConfigError::ArenaTooSmall {
                width: 4,
                height: 1
            })
        ));
        assert!(GameConfig::new(0, 20).is_err());
    }

    #[test]
    fn test_preview_len_bounds() {
        let config = GameConfig::default();
        assert_eq!(config.with_preview_len(3).unwrap().preview_len(), 3);
        assert!(config.with_preview_len(0).is_err());
        assert!(config.with_preview_len(6).is_err());
    }

    #[test]
    fn test_scoring_policy_deserializes_missing_fields_as_off() {
        let policy: ScoringPolicy = serde_json::from_str(r#"{"combo":true}"#).unwrap();
        assert_eq!(
            policy,
            ScoringPolicy {
                combo: true,
                back_to_back: false
            }
        );
    }
}
