//! Persistent player data: high score, leaderboard and settings.
//!
//! Values live in a [`KeyValueStore`] as JSON, one key per concern. Missing
//! keys read as defaults; unreadable values are logged and also read as
//! defaults, so a corrupt file never prevents playing.
//!
//! # Example
//!
//! ```
//! use blocktris_profile::{MemoryStore, Profile, Theme};
//!
//! let mut profile = Profile::new(MemoryStore::new());
//! assert_eq!(profile.high_score()?, 0);
//! assert!(profile.record_high_score(1200)?);
//!
//! let mut settings = profile.settings()?;
//! settings.theme = Theme::Neon;
//! profile.save_settings(&settings)?;
//! assert_eq!(profile.settings()?.theme, Theme::Neon);
//! # Ok::<(), blocktris_profile::StoreError>(())
//! ```

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

pub use self::{leaderboard::*, settings::*, store::*};

mod leaderboard;
mod settings;
mod store;

const HIGH_SCORE_KEY: &str = "high_score";
const LEADERBOARD_KEY: &str = "leaderboard";
const THEME_KEY: &str = "theme";
const SOUND_KEY: &str = "sound";
const MUSIC_KEY: &str = "music";
const BINDINGS_KEY: &str = "bindings";
const SCORING_KEY: &str = "scoring";

/// Typed access to the values kept in a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct Profile<S> {
    store: S,
}

impl<S> Profile<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.store.get(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed stored value");
                Ok(T::default())
            }
        }
    }

    fn load_or<T>(&self, key: &str, default: T) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        Ok(self.load::<Option<T>>(key)?.unwrap_or(default))
    }

    fn save<T>(&mut self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    pub fn high_score(&self) -> Result<u64, StoreError> {
        self.load(HIGH_SCORE_KEY)
    }

    /// Stores `score` if it beats the current high score; returns whether it did.
    pub fn record_high_score(&mut self, score: u64) -> Result<bool, StoreError> {
        if score <= self.high_score()? {
            return Ok(false);
        }
        self.save(HIGH_SCORE_KEY, &score)?;
        debug!(score, "new high score");
        Ok(true)
    }

    pub fn leaderboard(&self) -> Result<Leaderboard, StoreError> {
        let board: Leaderboard = self.load(LEADERBOARD_KEY)?;
        // Re-establish ordering for hand-edited files.
        Ok(Leaderboard::from_entries(board.entries().to_vec()))
    }

    /// Adds a finished game to the leaderboard and returns its zero-based rank,
    /// or `None` if the score did not make the cut.
    pub fn submit_score(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, StoreError> {
        let mut board = self.leaderboard()?;
        let rank = board.insert(entry);
        if rank.is_some() {
            self.save(LEADERBOARD_KEY, &board)?;
        }
        Ok(rank)
    }

    pub fn settings(&self) -> Result<Settings, StoreError> {
        let defaults = Settings::default();
        Ok(Settings {
            theme: self.load(THEME_KEY)?,
            sound: self.load_or(SOUND_KEY, defaults.sound)?,
            music: self.load_or(MUSIC_KEY, defaults.music)?,
            bindings: self.load(BINDINGS_KEY)?,
            scoring: self.load(SCORING_KEY)?,
        })
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.save(THEME_KEY, &settings.theme)?;
        self.save(SOUND_KEY, &settings.sound)?;
        self.save(MUSIC_KEY, &settings.music)?;
        self.save(BINDINGS_KEY, &settings.bindings)?;
        self.save(SCORING_KEY, &settings.scoring)
    }

    pub fn reset_bindings(&mut self) -> Result<(), StoreError> {
        self.store.remove(BINDINGS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use blocktris_engine::Command;
    use chrono::NaiveDate;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_empty_profile_has_defaults() {
        let profile = Profile::new(MemoryStore::new());
        assert_eq!(profile.high_score().unwrap(), 0);
        assert!(profile.leaderboard().unwrap().is_empty());
        assert_eq!(profile.settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_high_score_only_increases() {
        let mut profile = Profile::new(MemoryStore::new());
        assert!(profile.record_high_score(500).unwrap());
        assert!(!profile.record_high_score(300).unwrap());
        assert!(!profile.record_high_score(500).unwrap());
        assert_eq!(profile.high_score().unwrap(), 500);
    }

    #[test]
    fn test_corrupt_values_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "not a number").unwrap();
        store.set(LEADERBOARD_KEY, "{").unwrap();
        store.set(BINDINGS_KEY, "[1, 2]").unwrap();
        store.set(SOUND_KEY, "\"loud\"").unwrap();
        let profile = Profile::new(store);

        assert_eq!(profile.high_score().unwrap(), 0);
        assert!(profile.leaderboard().unwrap().is_empty());
        let settings = profile.settings().unwrap();
        assert_eq!(settings.bindings, KeyBindings::default());
        assert!(settings.sound);
    }

    #[test]
    fn test_submit_score_persists_top_ten() {
        let mut profile = Profile::new(MemoryStore::new());
        for score in 1..=12 {
            profile
                .submit_score(LeaderboardEntry::new("p", score * 10, 1, date()))
                .unwrap();
        }
        let board = profile.leaderboard().unwrap();
        assert_eq!(board.entries().len(), 10);
        assert_eq!(board.entries()[0].score, 120);
        assert_eq!(board.entries()[9].score, 30);
        assert_eq!(
            profile
                .submit_score(LeaderboardEntry::new("late", 5, 1, date()))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_unsorted_stored_leaderboard_is_reordered() {
        let mut store = MemoryStore::new();
        store
            .set(
                LEADERBOARD_KEY,
                r#"[{"name":"a","score":10,"level":1,"date":"2025-01-02"},
                    {"name":"b","score":90,"level":3,"date":"2025-01-02"}]"#,
            )
            .unwrap();
        let profile = Profile::new(store);
        let board = profile.leaderboard().unwrap();
        assert_eq!(board.entries()[0].name, "b");
    }

    #[test]
    fn test_settings_round_trip_and_reset_bindings() {
        let mut profile = Profile::new(MemoryStore::new());
        let mut settings = profile.settings().unwrap();
        settings.theme = Theme::Vaporwave;
        settings.music = false;
        settings.scoring.combo = true;
        settings.bindings.set(Command::Hold, "h");
        profile.save_settings(&settings).unwrap();

        assert_eq!(profile.settings().unwrap(), settings);

        profile.reset_bindings().unwrap();
        let reloaded = profile.settings().unwrap();
        assert_eq!(reloaded.bindings, KeyBindings::default());
        assert_eq!(reloaded.theme, Theme::Vaporwave);
    }

    #[test]
    fn test_file_backed_profile_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut profile = Profile::new(FileStore::new(dir.path()));
            profile.record_high_score(4200).unwrap();
            profile
                .submit_score(LeaderboardEntry::new("Ann", 4200, 5, date()))
                .unwrap();
        }
        let profile = Profile::new(FileStore::new(dir.path()));
        assert_eq!(profile.high_score().unwrap(), 4200);
        assert_eq!(profile.leaderboard().unwrap().entries()[0].name, "Ann");
    }
}
