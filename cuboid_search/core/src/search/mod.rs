//! Search strategies for a perfect cuboid
//!
//! Three independent strategies share one result model:
//! - [`GeneticOracle`]: evolves gene quadruples that generate Euler-brick-like boxes
//! - [`GradientHarmonizer`]: walks a single box downhill on a heuristic potential
//! - [`InverseReconstructor`]: solves for sides from triples of face diagonals
//!
//! None of them fail. Each returns a [`SearchOutcome`] with its best-ever
//! candidate and a [`Termination`] saying why it stopped.

pub mod cancel;
pub mod genetic;
pub mod harmonizer;
pub mod inverse;
pub mod observer;
pub mod outcome;
pub mod record;

pub use cancel::CancelToken;
pub use genetic::{Evaluated, GeneticConfig, GeneticOracle, Population};
pub use harmonizer::{GradientHarmonizer, HarmonizerConfig, HarmonizerReport};
pub use inverse::{
    reconstruct, solve_diagonals, InverseConfig, InverseReconstructor, Reconstruction,
};
pub use observer::{GenerationStats, NoopObserver, SearchObserver, SearchProgress, TracingObserver};
pub use outcome::{OutcomeError, OutcomeResult, SearchOutcome, Strategy, Termination};
pub use record::BestRecord;
