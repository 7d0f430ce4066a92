//! Gradient harmonizer
//!
//! Local descent from a single starting box. The vector is real-valued
//! within an iteration and snapped back to integers at the end of it.
//!
//! The force on each axis is a weighted sum of one-sided finite differences
//! (+1 on that axis) of the entropy and the three disharmony potentials, all
//! taken at the same pre-update point. Axes move independently.

use super::cancel::CancelToken;
use super::observer::{NoopObserver, SearchObserver, SearchProgress};
use super::outcome::{SearchOutcome, Strategy, Termination};
use super::record::BestRecord;
use crate::cuboid::{Candidate, PotentialWeights, Potentials};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gradient harmonizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizerConfig {
    /// Starting box
    pub start: Candidate,

    /// Iteration budget
    pub iterations: u64,

    /// Step size applied to each axis force
    pub learning_rate: f64,

    /// Weights for the entropy and potential terms
    pub weights: PotentialWeights,

    /// Snap each axis back to the parity it started with
    pub preserve_parity: bool,

    /// Iterations between progress reports
    pub progress_interval: u64,
}

impl Default for HarmonizerConfig {
    fn default() -> Self {
        Self {
            start: Candidate::new(44, 117, 240),
            iterations: 2000,
            learning_rate: 0.05,
            weights: PotentialWeights::default(),
            preserve_parity: false,
            progress_interval: 200,
        }
    }
}

/// Harmonizer result: the shared outcome plus where the walk ended
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonizerReport {
    /// Outcome carrying the best-ever state
    pub outcome: SearchOutcome,

    /// Last quantized state, which may be worse than the best
    pub final_state: Candidate,
}

/// Local heuristic descent over a single candidate
pub struct GradientHarmonizer {
    config: HarmonizerConfig,
}

impl GradientHarmonizer {
    pub fn new(config: HarmonizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarmonizerConfig {
        &self.config
    }

    pub fn run(&self) -> HarmonizerReport {
        self.run_with(&mut NoopObserver, &CancelToken::new())
    }

    pub fn run_with(
        &self,
        observer: &mut dyn SearchObserver,
        cancel: &CancelToken,
    ) -> HarmonizerReport {
        let start = self.config.start;
        let origin = start.sides();
        debug!(start = %start, iterations = self.config.iterations, "harmonizer starting");

        let mut state = to_vector(start);
        let mut record = BestRecord::starting_at(start.scored());
        let mut iteration: u64 = 0;

        let termination = loop {
            if to_candidate(state).entropy().is_perfect() {
                break Termination::Success;
            }
            if iteration >= self.config.iterations {
                break Termination::BudgetExhausted;
            }
            if cancel.is_cancelled() {
                break Termination::Cancelled;
            }

            state = self.step(state, origin);
            iteration += 1;

            let next = record.consider(to_candidate(state).scored());
            if next != record {
                record = next;
                observer.on_improvement(&SearchProgress {
                    strategy: Strategy::Harmonizer,
                    step: iteration,
                    best: record.best(),
                });
            }

            let interval = self.config.progress_interval;
            if interval > 0 && iteration % interval == 0 {
                observer.on_progress(&SearchProgress {
                    strategy: Strategy::Harmonizer,
                    step: iteration,
                    best: record.best(),
                });
            }
        };

        let final_state = to_candidate(state);
        debug!(?termination, iterations = iteration, last = %final_state, "harmonizer finished");

        HarmonizerReport {
            outcome: SearchOutcome {
                strategy: Strategy::Harmonizer,
                termination,
                best: record.best(),
                steps: iteration,
            },
            final_state,
        }
    }

    /// One update: forces, per-axis descent, quantization
    pub fn step(&self, state: [f64; 3], origin: [i64; 3]) -> [f64; 3] {
        let forces = self.forces(state);
        let rate = self.config.learning_rate;

        let mut next = state;
        for axis in 0..3 {
            let moved = state[axis] - rate * forces[axis];
            next[axis] = self.quantize(moved, state[axis], origin[axis]);
        }
        next
    }

    /// Combined force per axis from +1 finite differences
    pub fn forces(&self, state: [f64; 3]) -> [f64; 3] {
        let weights = &self.config.weights;
        let entropy_here = entropy_at(state);
        let here = Potentials::at(state);

        let mut forces = [0.0; 3];
        for (axis, force) in forces.iter_mut().enumerate() {
            let mut nudged = state;
            nudged[axis] += 1.0;
            let there = Potentials::at(nudged);

            *force = weights.entropy * difference(entropy_at(nudged), entropy_here)
                + weights.geometric * difference(there.geometric, here.geometric)
                + weights.rhythmic * difference(there.rhythmic, here.rhythmic)
                + weights.unifying * difference(there.unifying, here.unifying);
        }
        forces
    }

    /// Round half to even, take |x|, and optionally restore the starting parity
    ///
    /// A non-finite result keeps the previous value.
    fn quantize(&self, value: f64, previous: f64, origin: i64) -> f64 {
        let rounded = value.round_ties_even().abs();
        if !rounded.is_finite() {
            return previous;
        }

        let snapped = rounded.min(i64::MAX as f64);
        let parity_flipped = (snapped as i64).wrapping_sub(origin).rem_euclid(2) != 0;
        if self.config.preserve_parity && parity_flipped {
            snapped + 1.0
        } else {
            snapped
        }
    }
}

fn to_vector(candidate: Candidate) -> [f64; 3] {
    candidate.sides().map(|side| side as f64)
}

fn to_candidate(state: [f64; 3]) -> Candidate {
    Candidate::from(state.map(|side| side as i64))
}

fn entropy_at(state: [f64; 3]) -> f64 {
    to_candidate(state).entropy().value() as f64
}

/// Finite difference, with non-finite results contributing no force
fn difference(after: f64, before: f64) -> f64 {
    let delta = after - before;
    if delta.is_finite() {
        delta
    } else {
        0.0
    }
}
