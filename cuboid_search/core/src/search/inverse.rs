//! Inverse reconstructor
//!
//! Exhaustive search over triples of Pythagorean hypotenuses, each triple
//! treated as the three face diagonals of a box. Sides are recovered from
//!
//!   a² = (d_ab² + d_ac² − d_bc²) / 2
//!   b² = (d_ab² + d_bc² − d_ac²) / 2
//!   c² = (d_ac² + d_bc² − d_ab²) / 2
//!
//! Triples come from the pool in ascending index order, so the first hit is
//! the same on every run.

use super::cancel::CancelToken;
use super::observer::{NoopObserver, SearchObserver, SearchProgress};
use super::outcome::{SearchOutcome, Strategy, Termination};
use super::record::BestRecord;
use crate::cuboid::{integer_sqrt, is_perfect_square, Candidate};
use crate::genes::HypotenusePool;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Inverse reconstructor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InverseConfig {
    /// Largest hypotenuse admitted to the pool
    pub limit: u64,

    /// Combinations between progress reports
    pub progress_interval: u64,
}

impl Default for InverseConfig {
    fn default() -> Self {
        Self {
            limit: 300,
            progress_interval: 500_000,
        }
    }
}

/// What a diagonal triple reconstructs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconstruction {
    /// Some side is not a positive integer
    Rejected,
    /// Integer sides, but the space diagonal is not an integer
    EulerBrick(Candidate),
    /// All four diagonals are integers
    PerfectCuboid(Candidate),
}

impl Reconstruction {
    pub fn candidate(&self) -> Option<Candidate> {
        match self {
            Reconstruction::Rejected => None,
            Reconstruction::EulerBrick(c) | Reconstruction::PerfectCuboid(c) => Some(*c),
        }
    }
}

/// Recover a box from three face diagonals
///
/// The sides are tested in order a, b, c; the first that is not a positive
/// integer rejects the triple.
pub fn solve_diagonals(d_ab: u64, d_ac: u64, d_bc: u64) -> Reconstruction {
    let ab = i128::from(d_ab) * i128::from(d_ab);
    let ac = i128::from(d_ac) * i128::from(d_ac);
    let bc = i128::from(d_bc) * i128::from(d_bc);

    let mut sides = [0i64; 3];
    for (side, (x, y, z)) in sides.iter_mut().zip([(ab, ac, bc), (ab, bc, ac), (ac, bc, ab)]) {
        match side_from_diagonals(x, y, z) {
            Some(value) => *side = value,
            None => return Reconstruction::Rejected,
        }
    }
    let candidate = Candidate::from(sides).sorted();

    // a² + b² + c² = (d_ab² + d_ac² + d_bc²) / 2
    let space = ab
        .checked_add(ac)
        .and_then(|sum| sum.checked_add(bc))
        .and_then(|sum| u128::try_from(sum / 2).ok());
    match space {
        Some(space) if is_perfect_square(space) => Reconstruction::PerfectCuboid(candidate),
        _ => Reconstruction::EulerBrick(candidate),
    }
}

/// Side whose square is (x + y − z) / 2, if that is a positive perfect square
fn side_from_diagonals(x: i128, y: i128, z: i128) -> Option<i64> {
    let doubled = x.checked_add(y)?.checked_sub(z)?;
    if doubled <= 0 || doubled % 2 != 0 {
        return None;
    }
    let square = u128::try_from(doubled / 2).ok()?;
    let root = integer_sqrt(square);
    if root * root != square {
        return None;
    }
    i64::try_from(root).ok()
}

/// Exhaustive search over hypotenuse triples
pub struct InverseReconstructor {
    config: InverseConfig,
}

impl InverseReconstructor {
    pub fn new(config: InverseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InverseConfig {
        &self.config
    }

    pub fn run(&self) -> SearchOutcome {
        self.run_with(&mut NoopObserver, &CancelToken::new())
    }

    pub fn run_with(
        &self,
        observer: &mut dyn SearchObserver,
        cancel: &CancelToken,
    ) -> SearchOutcome {
        let pool = HypotenusePool::build(self.config.limit);
        debug!(
            limit = self.config.limit,
            hypotenuses = pool.len(),
            combinations = %pool.combination_count(),
            "hypotenuse pool built"
        );

        let mut record = BestRecord::empty();
        let mut tested: u64 = 0;

        for (d_ab, d_ac, d_bc) in pool.combinations() {
            if cancel.is_cancelled() {
                return outcome(Termination::Cancelled, record, tested);
            }
            tested += 1;

            let reconstruction = solve_diagonals(d_ab, d_ac, d_bc);
            if let Some(candidate) = reconstruction.candidate() {
                let next = record.consider(candidate.scored());
                if next != record {
                    record = next;
                    observer.on_improvement(&SearchProgress {
                        strategy: Strategy::Inverse,
                        step: tested,
                        best: record.best(),
                    });
                }
            }

            if let Reconstruction::PerfectCuboid(candidate) = reconstruction {
                info!(%candidate, diagonals = ?(d_ab, d_ac, d_bc), "perfect cuboid reconstructed");
                return outcome(Termination::Success, record, tested);
            }

            let interval = self.config.progress_interval;
            if interval > 0 && tested % interval == 0 {
                observer.on_progress(&SearchProgress {
                    strategy: Strategy::Inverse,
                    step: tested,
                    best: record.best(),
                });
            }
        }

        outcome(Termination::PoolExhausted, record, tested)
    }
}

/// Run the reconstructor with default reporting over hypotenuses up to `limit`
pub fn reconstruct(limit: u64) -> SearchOutcome {
    InverseReconstructor::new(InverseConfig {
        limit,
        ..InverseConfig::default()
    })
    .run()
}

fn outcome(termination: Termination, record: BestRecord, steps: u64) -> SearchOutcome {
    SearchOutcome {
        strategy: Strategy::Inverse,
        termination,
        best: record.best(),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_known_euler_brick() {
        // Face diagonals of (44, 117, 240)
        assert_eq!(
            solve_diagonals(125, 244, 267),
            Reconstruction::EulerBrick(Candidate::new(44, 117, 240))
        );
    }

    #[test]
    fn test_solve_rejects_negative_side() {
        // 5² + 5² − 25² < 0
        assert_eq!(solve_diagonals(5, 5, 25), Reconstruction::Rejected);
    }

    #[test]
    fn test_solve_rejects_odd_double() {
        // 5² + 10² − 13² = −44
        assert_eq!(solve_diagonals(5, 10, 13), Reconstruction::Rejected);
        // 25 + 100 − 100 = 25 is odd
        assert_eq!(solve_diagonals(5, 10, 10), Reconstruction::Rejected);
    }

    #[test]
    fn test_tiny_pool_is_empty_search() {
        let outcome = reconstruct(5);
        assert_eq!(outcome.termination, Termination::PoolExhausted);
        assert_eq!(outcome.steps, 0);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_counts_every_combination() {
        let outcome = reconstruct(25);
        assert_eq!(outcome.termination, Termination::PoolExhausted);
        assert_eq!(outcome.steps, 35);
    }

    #[test]
    fn test_finds_smallest_euler_brick() {
        let outcome = reconstruct(270);
        let pool = HypotenusePool::build(270);

        assert_eq!(outcome.termination, Termination::PoolExhausted);
        assert_eq!(u128::from(outcome.steps), pool.combination_count());

        let best = outcome.best.unwrap();
        assert_eq!(best.candidate, Candidate::new(44, 117, 240));
        assert_eq!(best.entropy.value(), 1);
    }

    #[test]
    fn test_progress_interval() {
        struct Steps(Vec<u64>);
        impl SearchObserver for Steps {
            fn on_progress(&mut self, progress: &SearchProgress) {
                self.0.push(progress.step);
            }
        }

        let mut steps = Steps(Vec::new());
        let reconstructor = InverseReconstructor::new(InverseConfig {
            limit: 25,
            progress_interval: 10,
        });
        reconstructor.run_with(&mut steps, &CancelToken::new());
        assert_eq!(steps.0, vec![10, 20, 30]);
    }

    #[test]
    fn test_cancelled_mid_run() {
        struct CancelAt(u64, CancelToken);
        impl SearchObserver for CancelAt {
            fn on_progress(&mut self, progress: &SearchProgress) {
                if progress.step == self.0 {
                    self.1.cancel();
                }
            }
        }

        let cancel = CancelToken::new();
        let mut observer = CancelAt(100_000, cancel.clone());
        let reconstructor = InverseReconstructor::new(InverseConfig {
            limit: 2000,
            progress_interval: 25_000,
        });
        let outcome = reconstructor.run_with(&mut observer, &cancel);

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert_eq!(outcome.steps, 100_000);
        assert!(u128::from(outcome.steps) < HypotenusePool::build(2000).combination_count());
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let reconstructor = InverseReconstructor::new(InverseConfig::default());
        let outcome = reconstructor.run_with(&mut NoopObserver, &cancel);

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert_eq!(outcome.steps, 0);
    }
}
