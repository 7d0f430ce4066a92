//! Entropy: the discrete fitness of a candidate box
//!
//! Entropy counts how many of the four squared diagonals are *not* perfect
//! squares. A perfect cuboid is exactly a box with entropy 0.
//!
//! The square test uses an exact integer square root, so the result holds
//! for every `u128` input rather than only up to double precision.

use super::candidate::Candidate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Count (0..=4) of non-square diagonals
///
/// Invariants:
/// - `0` iff the candidate is a perfect cuboid
/// - `4` is also the sentinel for any box with a non-positive side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EntropyScore(u8);

/// A stored score outside 0..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entropy score {0} is out of range 0..=4")]
pub struct ScoreOutOfRange(pub u8);

impl EntropyScore {
    /// Perfect cuboid
    pub const PERFECT: EntropyScore = EntropyScore(0);

    /// Sentinel for invalid boxes, and the worst possible score
    pub const INVALID: EntropyScore = EntropyScore(4);

    /// Build from a count of failing diagonals, saturating at 4
    pub fn from_count(count: u8) -> Self {
        EntropyScore(count.min(4))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_perfect(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for EntropyScore {
    type Error = ScoreOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= EntropyScore::INVALID.0 {
            Ok(EntropyScore(value))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }
}

impl From<EntropyScore> for u8 {
    fn from(score: EntropyScore) -> u8 {
        score.0
    }
}

impl Default for EntropyScore {
    fn default() -> Self {
        EntropyScore::INVALID
    }
}

impl fmt::Display for EntropyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entropy of the box with sides (a, b, c)
///
/// Returns [`EntropyScore::INVALID`] without computing diagonals when any
/// side is ≤ 0. Pure and total: every input yields a score.
pub fn entropy(a: i64, b: i64, c: i64) -> EntropyScore {
    Candidate::new(a, b, c).entropy()
}

/// Floor of the square root of `n`, exact for the whole `u128` range
pub fn integer_sqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }

    // Float estimate, then correct by at most a few steps either way
    let mut root = (n as f64).sqrt() as u128;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).map_or(false, |sq| sq <= n) {
        root += 1;
    }
    root
}

/// `true` iff `n` = k² for some integer k
pub fn is_perfect_square(n: u128) -> bool {
    let root = integer_sqrt(n);
    root * root == n
}
