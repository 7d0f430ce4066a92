//! Cuboid module - candidate boxes and the constraints they are judged by
//!
//! The evaluator here is shared by every search strategy:
//! - **candidate**: integer side triples, their derived diagonals and scored form
//! - **entropy**: the discrete fitness (count of non-square diagonals)
//! - **potentials**: smooth real-valued proxies used by the gradient harmonizer

pub mod candidate;
pub mod entropy;
pub mod potentials;

pub use candidate::{Candidate, DiagonalSet, ScoredCandidate};
pub use entropy::{entropy, integer_sqrt, is_perfect_square, EntropyScore, ScoreOutOfRange};
pub use potentials::{
    geometric_disharmony, rhythmic_disharmony, shape_hash, unifying_disharmony, Potentials,
    PotentialWeights, UNIFYING_TARGET,
};
