use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Source of upcoming piece kinds.
///
/// The randomizer is consulted one batch at a time: every batch is appended
/// to the queue as a whole.
#[derive(Debug, Clone)]
pub enum Randomizer {
    /// 7-bag: every batch is a shuffled permutation of all seven kinds.
    SevenBag(Pcg32),
    /// Fixed cyclic sequence: every batch is the whole sequence, in order.
    Sequence(Vec<PieceKind>),
}

impl Randomizer {
    /// Creates a 7-bag randomizer seeded for reproducible piece order.
    #[must_use]
    pub fn seven_bag(seed: PieceSeed) -> Self {
        Self::SevenBag(Pcg32::from_seed(seed.0))
    }

    /// Creates a randomizer that repeats `pieces` forever.
    ///
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    #[must_use]
    pub fn sequence(pieces: impl IntoIterator<Item = PieceKind>) -> Self {
        let pieces: Vec<_> = pieces.into_iter().collect();
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self::Sequence(pieces)
    }

    fn fill_batch(&mut self, queue: &mut VecDeque<PieceKind>) {
        match self {
            Randomizer::SevenBag(rng) => {
                let mut bag = PieceKind::ALL;
                bag.shuffle(rng);
                queue.extend(bag);
            }
            Randomizer::Sequence(pieces) => queue.extend(pieces.iter().copied()),
        }
    }
}

/// Upcoming pieces and the hold slot.
///
/// Whenever fewer than [`PieceQueue::MIN_LEN`] kinds remain in the queue, a
/// fresh batch from the [`Randomizer`] is appended, so the preview is never
/// shorter than that.
///
/// # Example
///
/// ```
/// use blocktris_engine::{PieceQueue, PieceSeed};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut queue = PieceQueue::with_seed(seed);
///
/// let first = queue.pop_next();
/// let upcoming: Vec<_> = queue.next_pieces().take(5).collect();
/// assert_eq!(upcoming.len(), 5);
/// assert_eq!(queue.hold(first), upcoming[0]);
/// ```
#[derive(Debug, Clone)]
pub struct PieceQueue {
    randomizer: Randomizer,
    queue: VecDeque<PieceKind>,
    held: Option<PieceKind>,
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::with_seed(rand::rng().random())
    }
}

impl PieceQueue {
    /// Minimum number of kinds kept in the queue.
    pub const MIN_LEN: usize = 5;

    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        let mut this = Self {
            randomizer,
            queue: VecDeque::with_capacity(PieceKind::LEN * 2),
            held: None,
        };
        this.refill();
        this
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::new(Randomizer::seven_bag(seed))
    }

    fn refill(&mut self) {
        while self.queue.len() < Self::MIN_LEN {
            self.randomizer.fill_batch(&mut self.queue);
        }
    }

    /// Empties the queue and the hold slot and draws a fresh first batch.
    ///
    /// The randomizer keeps its state: a seeded 7-bag continues its stream
    /// and a sequence restarts from its first element.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.held = None;
        self.refill();
    }

    /// Removes and returns the front of the queue.
    pub fn pop_next(&mut self) -> PieceKind {
        self.refill();
        let Some(next) = self.queue.pop_front() else {
            unreachable!("queue refilled above the minimum length");
        };
        self.refill();
        next
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    /// Returns the kind a hold would bring into play: the held kind, or the
    /// front of the queue if the slot is empty.
    #[must_use]
    pub fn peek_hold_result(&self) -> PieceKind {
        self.held.unwrap_or(self.queue[0])
    }

    /// Stows `current` and returns the kind that replaces it.
    pub fn hold(&mut self, current: PieceKind) -> PieceKind {
        self.held
            .replace(current)
            .unwrap_or_else(|| self.pop_next())
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }
}

/// 128-bit seed for the 7-bag randomizer.
///
/// Written as 32 hexadecimal digits (big-endian), both by [`fmt::Display`]
/// and in serialized form.
///
/// ```
/// use blocktris_engine::PieceSeed;
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex: {_0:?}")]
    InvalidDigit(#[error(not(source))] String),
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength(s.len()));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseSeedError::InvalidDigit(s.to_owned()));
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::InvalidDigit(s.to_owned()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
