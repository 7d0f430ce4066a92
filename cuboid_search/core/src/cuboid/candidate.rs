//! Candidate boxes and their derived diagonal sets

use super::entropy::{is_perfect_square, EntropyScore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer edge lengths (a, b, c) of a candidate box
///
/// No ordering is required. Gene bricks and reconstructions come out sorted;
/// the harmonizer reports its state as it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    pub a: i64,
    pub b: i64,
    pub c: i64,
}

impl Candidate {
    pub fn new(a: i64, b: i64, c: i64) -> Self {
        Candidate { a, b, c }
    }

    /// Same sides, ascending
    pub fn sorted(self) -> Self {
        let mut sides = self.sides();
        sides.sort_unstable();
        Candidate::new(sides[0], sides[1], sides[2])
    }

    pub fn sides(&self) -> [i64; 3] {
        [self.a, self.b, self.c]
    }

    /// All three sides strictly positive
    pub fn is_valid(&self) -> bool {
        self.a > 0 && self.b > 0 && self.c > 0
    }

    /// Squared diagonals, or `None` when any side is non-positive
    pub fn diagonals(&self) -> Option<DiagonalSet> {
        if !self.is_valid() {
            return None;
        }
        Some(DiagonalSet::from_sides(
            self.a.unsigned_abs(),
            self.b.unsigned_abs(),
            self.c.unsigned_abs(),
        ))
    }

    /// Number of non-square diagonals (4 for an invalid box)
    pub fn entropy(&self) -> EntropyScore {
        match self.diagonals() {
            Some(diagonals) => EntropyScore::from_count(diagonals.count_non_square()),
            None => EntropyScore::INVALID,
        }
    }

    /// Pair this candidate with its entropy
    pub fn scored(self) -> ScoredCandidate {
        ScoredCandidate {
            candidate: self,
            entropy: self.entropy(),
        }
    }
}

impl From<[i64; 3]> for Candidate {
    fn from(sides: [i64; 3]) -> Self {
        Candidate::new(sides[0], sides[1], sides[2])
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.a, self.b, self.c)
    }
}

/// The four squared diagonals of a box
///
/// Always derived from a [`Candidate`]; never stored on its own. Values are
/// `u128` so that any pair of `i64` sides squares and sums without overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagonalSet {
    /// a² + b²
    pub face_ab: u128,
    /// a² + c²
    pub face_ac: u128,
    /// b² + c²
    pub face_bc: u128,
    /// a² + b² + c²
    pub space: u128,
}

impl DiagonalSet {
    pub fn from_sides(a: u64, b: u64, c: u64) -> Self {
        let (a2, b2, c2) = (square(a), square(b), square(c));
        DiagonalSet {
            face_ab: a2 + b2,
            face_ac: a2 + c2,
            face_bc: b2 + c2,
            space: a2 + b2 + c2,
        }
    }

    pub fn values(&self) -> [u128; 4] {
        [self.face_ab, self.face_ac, self.face_bc, self.space]
    }

    /// How many of the four values fail the perfect-square test
    pub fn count_non_square(&self) -> u8 {
        self.values()
            .iter()
            .filter(|&&v| !is_perfect_square(v))
            .count() as u8
    }

    /// All three face diagonals are integers (an Euler brick)
    pub fn is_euler(&self) -> bool {
        is_perfect_square(self.face_ab)
            && is_perfect_square(self.face_ac)
            && is_perfect_square(self.face_bc)
    }
}

#[inline]
fn square(x: u64) -> u128 {
    let x = x as u128;
    x * x
}

/// A candidate together with its entropy score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub entropy: EntropyScore,
}

impl ScoredCandidate {
    /// Strictly lower entropy than `other`
    pub fn improves_on(&self, other: &ScoredCandidate) -> bool {
        self.entropy < other.entropy
    }
}

impl fmt::Display for ScoredCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [entropy={}]", self.candidate, self.entropy)
    }
}
