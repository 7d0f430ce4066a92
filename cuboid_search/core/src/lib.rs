//! Cuboid Search Core
//!
//! Heuristic and exhaustive searches for a perfect cuboid: a box with integer
//! sides whose three face diagonals and space diagonal are all integers.
//!
//! Candidates are scored by entropy, the number of non-integer diagonals.
//! Zero entropy is a perfect cuboid.

pub mod cuboid;  // Candidates, entropy and auxiliary potentials
pub mod genes;   // Gene quadruples and Pythagorean hypotenuse pools
pub mod search;  // Genetic, gradient and inverse strategies
pub mod loader;  // JSON run configuration

pub use cuboid::{entropy, Candidate, EntropyScore, ScoredCandidate};
pub use genes::{brick_from_genes, GeneQuadruple, HypotenusePool};
pub use loader::{load_config, ConfigError, LoadResult, SearchConfig};
pub use search::{
    CancelToken, GeneticConfig, GeneticOracle, GradientHarmonizer, HarmonizerConfig,
    HarmonizerReport, InverseConfig, InverseReconstructor, SearchObserver, SearchOutcome, Strategy,
    Termination,
};
