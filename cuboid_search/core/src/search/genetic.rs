//! Genetic oracle
//!
//! Population search over gene quadruples. Each generation runs
//! Evaluate → (Terminate | Select → Reproduce) → Evaluate, with the elite
//! slice carried over unchanged so the best-ever entropy cannot regress.

use super::cancel::CancelToken;
use super::observer::{GenerationStats, NoopObserver, SearchObserver, SearchProgress};
use super::outcome::{SearchOutcome, Strategy, Termination};
use super::record::BestRecord;
use crate::cuboid::{EntropyScore, ScoredCandidate};
use crate::genes::GeneQuadruple;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Genetic oracle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Maximum generations to evaluate
    pub generations: u64,

    /// Members per generation (held fixed)
    pub population_size: usize,

    /// Probability that a child has one gene perturbed
    pub mutation_rate: f64,

    /// Upper bound for m and p when seeding
    pub max_gene_value: u32,

    /// Share of each ranked generation kept as elites and parents
    pub elite_fraction: f64,

    /// Generations between progress reports
    pub progress_interval: u64,

    /// Seed for reproducible runs (entropy-seeded when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            generations: 1000,
            population_size: 100,
            mutation_rate: 0.1,
            max_gene_value: 20,
            elite_fraction: 0.1,
            progress_interval: 100,
            seed: None,
        }
    }
}

/// Ordered gene quadruples making up one generation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Population(Vec<GeneQuadruple>);

impl Population {
    pub fn new(members: Vec<GeneQuadruple>) -> Self {
        Population(members)
    }

    pub fn members(&self) -> &[GeneQuadruple] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneQuadruple> {
        self.0.iter()
    }
}

/// A population member with its generated, scored candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluated {
    pub genes: GeneQuadruple,
    pub scored: ScoredCandidate,
}

impl Evaluated {
    pub fn from_genes(genes: GeneQuadruple) -> Self {
        Evaluated {
            genes,
            scored: genes.to_candidate().scored(),
        }
    }

    pub fn entropy(&self) -> EntropyScore {
        self.scored.entropy
    }
}

/// Where the oracle's state machine is between steps
enum Phase {
    Evaluate { generation: u64, population: Population },
    Select { generation: u64, evaluated: Vec<Evaluated> },
    Done { termination: Termination, generations: u64 },
}

/// Population-based search over gene quadruples
pub struct GeneticOracle {
    config: GeneticConfig,
}

impl GeneticOracle {
    pub fn new(config: GeneticConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    /// Population size actually used (at least 1)
    pub fn population_size(&self) -> usize {
        self.config.population_size.max(1)
    }

    /// max(1, ⌊population × elite_fraction⌋), capped at the population
    pub fn elite_count(&self) -> usize {
        let size = self.population_size();
        let raw = (size as f64 * self.config.elite_fraction).floor();
        // NaN and negatives cast to 0
        (raw as usize).clamp(1, size)
    }

    /// Init: rejection-sample a full population of valid quadruples
    pub fn seed_population<R: Rng + ?Sized>(&self, rng: &mut R) -> Population {
        let members = (0..self.population_size())
            .map(|_| GeneQuadruple::random(rng, self.config.max_gene_value))
            .collect();
        Population::new(members)
    }

    /// Score every member, in population order
    pub fn evaluate(&self, population: &Population) -> Vec<Evaluated> {
        population.iter().copied().map(Evaluated::from_genes).collect()
    }

    /// Select + Reproduce: build the next generation from a ranked one
    ///
    /// `ranked` must be sorted ascending by entropy. The elite prefix is kept
    /// unchanged; the remaining slots are children of two elites drawn
    /// uniformly with replacement, mutated with probability `mutation_rate`.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        ranked: &[Evaluated],
        rng: &mut R,
    ) -> Population {
        let size = self.population_size();
        let elites: Vec<GeneQuadruple> = ranked
            .iter()
            .take(self.elite_count())
            .map(|e| e.genes)
            .collect();

        if elites.is_empty() {
            return self.seed_population(rng);
        }

        let mut next = Vec::with_capacity(size);
        next.extend(elites.iter().copied());

        while next.len() < size {
            let first = elites[rng.gen_range(0..elites.len())];
            let second = elites[rng.gen_range(0..elites.len())];

            let mut child = first.crossover(&second);
            if rng.gen::<f64>() < self.config.mutation_rate {
                let index = rng.gen_range(0..4);
                let offset = rng.gen_range(-2..=2);
                child = child.mutate(index, offset);
            }
            next.push(child);
        }

        Population::new(next)
    }

    /// Run with an entropy-seeded RNG, or the configured seed if present
    pub fn run(&self) -> SearchOutcome {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_with(&mut rng, &mut NoopObserver, &CancelToken::new())
    }

    /// Run with a fixed seed; identical seeds give identical outcomes
    pub fn run_seeded(&self, seed: u64) -> SearchOutcome {
        let mut rng = StdRng::seed_from_u64(seed);
        self.run_with(&mut rng, &mut NoopObserver, &CancelToken::new())
    }

    /// Run the full state machine with an injected RNG, observer and stop flag
    pub fn run_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        observer: &mut dyn SearchObserver,
        cancel: &CancelToken,
    ) -> SearchOutcome {
        debug!(
            generations = self.config.generations,
            population = self.population_size(),
            elites = self.elite_count(),
            "genetic oracle starting"
        );

        let mut record = BestRecord::empty();
        let mut phase = if self.config.generations == 0 {
            Phase::Done {
                termination: Termination::BudgetExhausted,
                generations: 0,
            }
        } else {
            Phase::Evaluate {
                generation: 0,
                population: self.seed_population(rng),
            }
        };

        loop {
            phase = match phase {
                Phase::Evaluate { generation, population } => {
                    if cancel.is_cancelled() {
                        Phase::Done {
                            termination: Termination::Cancelled,
                            generations: generation,
                        }
                    } else {
                        let (evaluated, next_record) =
                            self.evaluate_generation(generation, &population, record, observer);
                        record = next_record;
                        let size = population.len();
                        self.after_evaluation(generation, size, evaluated, record, observer)
                    }
                }
                Phase::Select { generation, mut evaluated } => {
                    // Stable sort keeps ties in population order
                    evaluated.sort_by_key(Evaluated::entropy);
                    Phase::Evaluate {
                        generation: generation + 1,
                        population: self.next_generation(&evaluated, rng),
                    }
                }
                Phase::Done { termination, generations } => {
                    debug!(?termination, generations, "genetic oracle finished");
                    return SearchOutcome {
                        strategy: Strategy::Genetic,
                        termination,
                        best: record.best(),
                        steps: generations,
                    };
                }
            };
        }
    }

    /// Evaluate members in order, stopping at the first perfect cuboid
    fn evaluate_generation(
        &self,
        generation: u64,
        population: &Population,
        mut record: BestRecord,
        observer: &mut dyn SearchObserver,
    ) -> (Vec<Evaluated>, BestRecord) {
        let mut evaluated = Vec::with_capacity(population.len());

        for &genes in population.iter() {
            let member = Evaluated::from_genes(genes);
            let next = record.consider(member.scored);
            if next != record {
                record = next;
                observer.on_improvement(&SearchProgress {
                    strategy: Strategy::Genetic,
                    step: generation + 1,
                    best: record.best(),
                });
            }
            evaluated.push(member);

            if member.entropy().is_perfect() {
                break;
            }
        }

        (evaluated, record)
    }

    /// Terminate check, then hand off to selection
    ///
    /// `evaluated` may be shorter than the population when a perfect cuboid
    /// ended evaluation early.
    fn after_evaluation(
        &self,
        generation: u64,
        population_size: usize,
        evaluated: Vec<Evaluated>,
        record: BestRecord,
        observer: &mut dyn SearchObserver,
    ) -> Phase {
        let completed = generation + 1;
        let generation_best = evaluated
            .iter()
            .map(Evaluated::entropy)
            .min()
            .unwrap_or(EntropyScore::INVALID);

        observer.on_generation(&GenerationStats {
            generation,
            population_size,
            generation_best,
            best_ever: record.best(),
        });

        let interval = self.config.progress_interval;
        if interval > 0 && completed % interval == 0 {
            observer.on_progress(&SearchProgress {
                strategy: Strategy::Genetic,
                step: completed,
                best: record.best(),
            });
        }

        if generation_best.is_perfect() {
            Phase::Done {
                termination: Termination::Success,
                generations: completed,
            }
        } else if completed >= self.config.generations {
            Phase::Done {
                termination: Termination::BudgetExhausted,
                generations: completed,
            }
        } else {
            Phase::Select { generation, evaluated }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GeneticConfig {
        GeneticConfig {
            generations: 20,
            population_size: 30,
            mutation_rate: 0.2,
            max_gene_value: 15,
            elite_fraction: 0.1,
            progress_interval: 5,
            seed: None,
        }
    }

    #[derive(Default)]
    struct Recorder {
        generations: Vec<GenerationStats>,
        progress: Vec<u64>,
        improvements: usize,
    }

    impl SearchObserver for Recorder {
        fn on_progress(&mut self, progress: &SearchProgress) {
            self.progress.push(progress.step);
        }

        fn on_improvement(&mut self, _progress: &SearchProgress) {
            self.improvements += 1;
        }

        fn on_generation(&mut self, stats: &GenerationStats) {
            self.generations.push(*stats);
        }
    }

    #[test]
    fn test_elite_count() {
        let oracle = GeneticOracle::new(GeneticConfig::default());
        assert_eq!(oracle.elite_count(), 10);

        let tiny = GeneticOracle::new(GeneticConfig {
            population_size: 5,
            ..GeneticConfig::default()
        });
        assert_eq!(tiny.elite_count(), 1);

        let everything = GeneticOracle::new(GeneticConfig {
            population_size: 5,
            elite_fraction: 3.0,
            ..GeneticConfig::default()
        });
        assert_eq!(everything.elite_count(), 5);
    }

    #[test]
    fn test_seed_population_valid_and_sized() {
        let oracle = GeneticOracle::new(small_config());
        let mut rng = StdRng::seed_from_u64(3);
        let population = oracle.seed_population(&mut rng);

        assert_eq!(population.len(), 30);
        assert!(population.iter().all(GeneQuadruple::is_valid));
    }

    #[test]
    fn test_next_generation_keeps_elites() {
        let oracle = GeneticOracle::new(small_config());
        let mut rng = StdRng::seed_from_u64(11);

        let population = oracle.seed_population(&mut rng);
        let mut ranked = oracle.evaluate(&population);
        ranked.sort_by_key(Evaluated::entropy);

        let next = oracle.next_generation(&ranked, &mut rng);
        assert_eq!(next.len(), 30);

        let elites = oracle.elite_count();
        for (kept, original) in next.members().iter().zip(ranked.iter()).take(elites) {
            assert_eq!(*kept, original.genes);
        }
    }

    #[test]
    fn test_children_mix_elite_genes() {
        let config = GeneticConfig {
            mutation_rate: 0.0,
            ..small_config()
        };
        let oracle = GeneticOracle::new(config);
        let mut rng = StdRng::seed_from_u64(5);

        let population = oracle.seed_population(&mut rng);
        let mut ranked = oracle.evaluate(&population);
        ranked.sort_by_key(Evaluated::entropy);
        let elites: Vec<_> = ranked.iter().take(oracle.elite_count()).map(|e| e.genes).collect();

        let next = oracle.next_generation(&ranked, &mut rng);
        for child in next.members() {
            assert!(elites.iter().any(|e| e.m == child.m && e.n == child.n));
            assert!(elites.iter().any(|e| e.p == child.p && e.q == child.q));
        }
    }

    #[test]
    fn test_zero_generations() {
        let oracle = GeneticOracle::new(GeneticConfig {
            generations: 0,
            ..small_config()
        });
        let outcome = oracle.run_seeded(1);

        assert_eq!(outcome.termination, Termination::BudgetExhausted);
        assert_eq!(outcome.steps, 0);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_budget_exhausted_reports_best() {
        let oracle = GeneticOracle::new(small_config());
        let outcome = oracle.run_seeded(42);

        assert_eq!(outcome.strategy, Strategy::Genetic);
        assert_eq!(outcome.termination, Termination::BudgetExhausted);
        assert_eq!(outcome.steps, 20);
        let best = outcome.best.expect("best is recorded after one generation");
        assert_eq!(best.entropy, best.candidate.entropy());
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let oracle = GeneticOracle::new(small_config());
        assert_eq!(oracle.run_seeded(99), oracle.run_seeded(99));
    }

    #[test]
    fn test_population_size_and_monotone_best() {
        let oracle = GeneticOracle::new(small_config());
        let mut rng = StdRng::seed_from_u64(2024);
        let mut recorder = Recorder::default();

        let outcome = oracle.run_with(&mut rng, &mut recorder, &CancelToken::new());

        assert_eq!(recorder.generations.len() as u64, outcome.steps);
        for stats in &recorder.generations {
            assert_eq!(stats.population_size, 30);
        }
        for pair in recorder.generations.windows(2) {
            let before = pair[0].best_ever.unwrap().entropy;
            let after = pair[1].best_ever.unwrap().entropy;
            assert!(after <= before);
        }
        assert_eq!(recorder.progress, vec![5, 10, 15, 20]);
        assert!(recorder.improvements >= 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let oracle = GeneticOracle::new(small_config());
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut rng = StdRng::seed_from_u64(8);
        let outcome = oracle.run_with(&mut rng, &mut NoopObserver, &cancel);

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert_eq!(outcome.steps, 0);
        assert!(outcome.best.is_none());
    }

    /// Cancels the run once progress reaches a given generation
    struct CancelAt {
        step: u64,
        cancel: CancelToken,
    }

    impl SearchObserver for CancelAt {
        fn on_progress(&mut self, progress: &SearchProgress) {
            if progress.step == self.step {
                self.cancel.cancel();
            }
        }
    }

    #[test]
    fn test_cancelled_mid_run_keeps_best() {
        let oracle = GeneticOracle::new(small_config());
        let cancel = CancelToken::new();
        let mut observer = CancelAt {
            step: 10,
            cancel: cancel.clone(),
        };

        let mut rng = StdRng::seed_from_u64(8);
        let outcome = oracle.run_with(&mut rng, &mut observer, &cancel);

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert_eq!(outcome.steps, 10);
        let best = outcome.best.unwrap();
        assert_eq!(best.entropy, best.candidate.entropy());
    }

    #[test]
    fn test_early_stop_reports_full_population() {
        let oracle = GeneticOracle::new(small_config());
        let mut rng = StdRng::seed_from_u64(17);
        let population = oracle.seed_population(&mut rng);

        // Evaluation halted after three members, the last one scored perfect
        let mut evaluated = oracle.evaluate(&population);
        evaluated.truncate(3);
        evaluated[2].scored.entropy = EntropyScore::PERFECT;
        let record = evaluated
            .iter()
            .fold(BestRecord::empty(), |record, member| record.consider(member.scored));

        let mut recorder = Recorder::default();
        let phase = oracle.after_evaluation(0, population.len(), evaluated, record, &mut recorder);

        assert!(matches!(
            phase,
            Phase::Done {
                termination: Termination::Success,
                generations: 1,
            }
        ));
        assert_eq!(recorder.generations.len(), 1);
        assert_eq!(recorder.generations[0].population_size, 30);
        assert!(recorder.generations[0].generation_best.is_perfect());
    }

    #[test]
    fn test_degenerate_config_does_not_panic() {
        let oracle = GeneticOracle::new(GeneticConfig {
            generations: 3,
            population_size: 0,
            mutation_rate: 7.0,
            max_gene_value: 0,
            elite_fraction: f64::NAN,
            progress_interval: 0,
            seed: None,
        });
        let outcome = oracle.run_seeded(0);
        assert_eq!(outcome.steps, 3);
        assert!(outcome.best.is_some());
    }
}
