//! Progress observation for long-running searches
//!
//! The core never prints. It hands snapshots to a [`SearchObserver`] and the
//! caller decides what to do with them.

use super::outcome::Strategy;
use crate::cuboid::{EntropyScore, ScoredCandidate};
use tracing::info;

/// Snapshot of a running search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProgress {
    pub strategy: Strategy,

    /// Generations, iterations, or combinations completed so far
    pub step: u64,

    /// Best-ever record at this point
    pub best: Option<ScoredCandidate>,
}

/// Per-generation statistics from the genetic oracle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Zero-based generation index
    pub generation: u64,

    /// Members in this generation's population, including any left unevaluated
    pub population_size: usize,

    /// Lowest entropy within this generation
    pub generation_best: EntropyScore,

    /// Best-ever record after this generation
    pub best_ever: Option<ScoredCandidate>,
}

/// Receives progress from a running search
///
/// All methods default to doing nothing.
pub trait SearchObserver {
    /// Called every `progress_interval` steps
    fn on_progress(&mut self, _progress: &SearchProgress) {}

    /// Called whenever the best-ever record strictly improves
    fn on_improvement(&mut self, _progress: &SearchProgress) {}

    /// Called once per evaluated generation (genetic oracle only)
    fn on_generation(&mut self, _stats: &GenerationStats) {}
}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn on_progress(&mut self, progress: &SearchProgress) {
        (**self).on_progress(progress)
    }

    fn on_improvement(&mut self, progress: &SearchProgress) {
        (**self).on_improvement(progress)
    }

    fn on_generation(&mut self, stats: &GenerationStats) {
        (**self).on_generation(stats)
    }
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Emits progress as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_progress(&mut self, progress: &SearchProgress) {
        match progress.best {
            Some(best) => info!(
                strategy = %progress.strategy,
                step = progress.step,
                best = %best.candidate,
                entropy = best.entropy.value(),
                "progress"
            ),
            None => info!(strategy = %progress.strategy, step = progress.step, "progress"),
        }
    }

    fn on_improvement(&mut self, progress: &SearchProgress) {
        if let Some(best) = progress.best {
            info!(
                strategy = %progress.strategy,
                step = progress.step,
                best = %best.candidate,
                entropy = best.entropy.value(),
                "new best"
            );
        }
    }
}
