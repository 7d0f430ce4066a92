//! Cuboid Search CLI
//!
//! Runs one search strategy and prints its outcome.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuboid_search_core::loader::{load_config, SearchConfig};
use cuboid_search_core::search::{
    CancelToken, GeneticOracle, GradientHarmonizer, InverseReconstructor, SearchOutcome,
    TracingObserver,
};
use cuboid_search_core::Candidate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cuboid-search")]
#[command(about = "Search for a perfect cuboid", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(short, long, global = true)]
    json: bool,

    /// Also write the outcome to this file as JSON
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Cancel the run after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve gene quadruples
    Genetic {
        /// Generation budget
        #[arg(short, long)]
        generations: Option<u64>,

        /// Population size
        #[arg(short, long)]
        population: Option<usize>,

        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Descend from a starting box
    Harmonize {
        a: i64,
        b: i64,
        c: i64,

        /// Iteration budget
        #[arg(short, long)]
        iterations: Option<u64>,

        /// Keep each side's starting parity
        #[arg(long)]
        preserve_parity: bool,
    },

    /// Reconstruct boxes from hypotenuse triples
    Inverse {
        /// Largest hypotenuse in the pool
        #[arg(short, long)]
        limit: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => SearchConfig::default(),
    };

    let cancel = CancelToken::new();
    if let Some(secs) = cli.timeout_secs {
        let token = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            warn!(secs, "timeout reached, cancelling");
            token.cancel();
        });
    }

    let mut observer = TracingObserver;
    let outcome = match cli.command {
        Commands::Genetic {
            generations,
            population,
            seed,
        } => {
            if let Some(generations) = generations {
                config.genetic.generations = generations;
            }
            if let Some(population) = population {
                config.genetic.population_size = population;
            }
            if seed.is_some() {
                config.genetic.seed = seed;
            }
            config.validate()?;

            let oracle = GeneticOracle::new(config.genetic);
            let mut rng = match oracle.config().seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            oracle.run_with(&mut rng, &mut observer, &cancel)
        }
        Commands::Harmonize {
            a,
            b,
            c,
            iterations,
            preserve_parity,
        } => {
            config.harmonizer.start = Candidate::new(a, b, c);
            if let Some(iterations) = iterations {
                config.harmonizer.iterations = iterations;
            }
            config.harmonizer.preserve_parity |= preserve_parity;
            config.validate()?;

            let report =
                GradientHarmonizer::new(config.harmonizer).run_with(&mut observer, &cancel);
            info!(final_state = %report.final_state, "harmonizer stopped");
            report.outcome
        }
        Commands::Inverse { limit } => {
            if let Some(limit) = limit {
                config.inverse.limit = limit;
            }
            config.validate()?;

            InverseReconstructor::new(config.inverse).run_with(&mut observer, &cancel)
        }
    };

    report(&outcome, cli.json)?;

    if let Some(path) = &cli.output {
        outcome
            .to_json_file(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

fn report(outcome: &SearchOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", outcome.to_json()?);
    } else {
        println!("{}", outcome);
        if outcome.is_success() {
            println!("PERFECT CUBOID FOUND");
        }
    }
    Ok(())
}
