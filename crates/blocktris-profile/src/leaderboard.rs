use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A finished game on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub level: usize,
    pub date: NaiveDate,
}

impl LeaderboardEntry {
    pub const DEFAULT_NAME: &str = "Player";

    /// Creates an entry; a blank name is replaced by [`Self::DEFAULT_NAME`].
    #[must_use]
    pub fn new(name: &str, score: u64, level: usize, date: NaiveDate) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            Self::DEFAULT_NAME
        } else {
            name
        };
        Self {
            name: name.to_owned(),
            score,
            level,
            date,
        }
    }
}

/// Best scores, highest first, at most [`Leaderboard::CAPACITY`] entries.
///
/// Among equal scores the older entry ranks first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub const CAPACITY: usize = 10;

    /// Builds a leaderboard from arbitrary entries, restoring the ordering and
    /// size invariants.
    #[must_use]
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(Self::CAPACITY);
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank_of(&self, score: u64) -> usize {
        self.entries.partition_point(|entry| entry.score >= score)
    }

    /// Returns whether a game with `score` would make it onto the board.
    #[must_use]
    pub fn qualifies(&self, score: u64) -> bool {
        self.rank_of(score) < Self::CAPACITY
    }

    /// Inserts `entry` and returns its zero-based rank, or `None` when the
    /// score is too low to be kept.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.rank_of(entry.score);
        if rank >= Self::CAPACITY {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(Self::CAPACITY);
        Some(rank)
    }
}
