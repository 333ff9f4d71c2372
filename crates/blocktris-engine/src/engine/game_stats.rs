use std::time::Duration;

use super::config::ScoringPolicy;

/// Base points for a line clear, indexed by the number of rows cleared
/// (clamped to 4) and multiplied by the level.
pub const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

/// Gravity interval per level in milliseconds (index = level − 1).
///
/// Levels beyond the table use the last entry.
pub const GRAVITY_TABLE_MS: [u64; 16] = [
    1000, 820, 680, 560, 460, 380, 310, 260, 220, 190, 160, 140, 120, 100, 85, 75,
];

/// Points per cell for a successful soft drop step.
pub const SOFT_DROP_POINTS: u64 = 1;
/// Points per cell fallen during a hard drop.
pub const HARD_DROP_POINTS: u64 = 2;

const COMBO_POINTS: u64 = 50;
const LINES_PER_LEVEL: usize = 10;

/// Score, line and level bookkeeping of a session.
///
/// # Scoring
///
/// - Soft drop: [`SOFT_DROP_POINTS`] per successful step
/// - Hard drop: [`HARD_DROP_POINTS`] per cell fallen
/// - Line clear: `LINE_SCORES[min(n, 4)] × level`, level taken before the
///   cleared lines are counted
/// - Optional combo and back-to-back bonuses, see [`ScoringPolicy`]
///
/// # Example
///
/// ```
/// use blocktris_engine::{GameStats, ScoringPolicy};
///
/// let mut stats = GameStats::new();
/// let points = stats.complete_piece_drop(4, ScoringPolicy::default());
///
/// assert_eq!(points, 800);
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    combo: Option<u64>,
    back_to_back: bool,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
            combo: None,
            back_to_back: false,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns `floor(lines / 10) + 1`.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / LINES_PER_LEVEL + 1
    }

    /// Time between gravity steps at the current level.
    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        let index = (self.level() - 1).min(GRAVITY_TABLE_MS.len() - 1);
        Duration::from_millis(GRAVITY_TABLE_MS[index])
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by rows cleared; index 4 also counts larger clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Length of the current combo chain (`0` on the first clear of a chain).
    #[must_use]
    pub const fn combo(&self) -> Option<u64> {
        self.combo
    }

    pub fn add_soft_drop(&mut self, cells: usize) -> u64 {
        self.add_points(cells, SOFT_DROP_POINTS)
    }

    pub fn add_hard_drop(&mut self, cells: usize) -> u64 {
        self.add_points(cells, HARD_DROP_POINTS)
    }

    fn add_points(&mut self, cells: usize, per_cell: u64) -> u64 {
        let points = u64::try_from(cells).unwrap_or(u64::MAX).saturating_mul(per_cell);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Records a locked piece and returns the line-clear points awarded.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize, policy: ScoringPolicy) -> u64 {
        let clamped = cleared_lines.min(LINE_SCORES.len() - 1);
        let level = self.level() as u64;

        self.completed_pieces += 1;
        self.line_cleared_counter[clamped] += 1;

        if cleared_lines == 0 {
            self.combo = None;
            return 0;
        }

        let mut base = LINE_SCORES[clamped];
        if clamped == 4 {
            if self.back_to_back && policy.back_to_back {
                base = base * 3 / 2;
            }
            self.back_to_back = true;
        } else {
            self.back_to_back = false;
        }

        let chain = self.combo.map_or(0, |n| n + 1);
        self.combo = Some(chain);

        let mut points = base * level;
        if policy.combo {
            points += COMBO_POINTS * chain * level;
        }

        self.total_cleared_lines += cleared_lines;
        self.score = self.score.saturating_add(points);
        points
    }
}
