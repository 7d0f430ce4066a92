//! Run configuration
//!
//! Every section is optional in the file; missing fields take the defaults
//! of the corresponding strategy config.

pub mod json;

pub use json::{load_config, parse_config, save_config};

use crate::search::{GeneticConfig, HarmonizerConfig, InverseConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings for all three strategies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub genetic: GeneticConfig,
    pub harmonizer: HarmonizerConfig,
    pub inverse: InverseConfig,
}

impl SearchConfig {
    /// Reject values the strategies would otherwise silently clamp
    pub fn validate(&self) -> LoadResult<()> {
        let genetic = &self.genetic;
        if genetic.population_size == 0 {
            return Err(invalid("genetic.population_size must be positive"));
        }
        if !(0.0..=1.0).contains(&genetic.mutation_rate) {
            return Err(invalid(format!(
                "genetic.mutation_rate must be in [0, 1], got {}",
                genetic.mutation_rate
            )));
        }
        if !(genetic.elite_fraction > 0.0 && genetic.elite_fraction <= 1.0) {
            return Err(invalid(format!(
                "genetic.elite_fraction must be in (0, 1], got {}",
                genetic.elite_fraction
            )));
        }
        if genetic.progress_interval == 0 {
            return Err(invalid("genetic.progress_interval must be positive"));
        }

        let harmonizer = &self.harmonizer;
        if !harmonizer.learning_rate.is_finite() {
            return Err(invalid("harmonizer.learning_rate must be finite"));
        }
        if !harmonizer.weights.is_finite() {
            return Err(invalid("harmonizer.weights must be finite"));
        }
        if harmonizer.progress_interval == 0 {
            return Err(invalid("harmonizer.progress_interval must be positive"));
        }

        if self.inverse.progress_interval == 0 {
            return Err(invalid("inverse.progress_interval must be positive"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

/// Configuration loader result
pub type LoadResult<T> = Result<T, ConfigError>;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File not found: {path}: {source}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Write failed: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_mutation_rate() {
        let mut config = SearchConfig::default();
        config.genetic.mutation_rate = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.genetic.mutation_rate = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_elite_fraction() {
        let mut config = SearchConfig::default();
        config.genetic.elite_fraction = 0.0;
        assert!(config.validate().is_err());

        // Whole population as elite is allowed
        config.genetic.elite_fraction = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_population() {
        let mut config = SearchConfig::default();
        config.genetic.population_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("population_size"));
    }

    #[test]
    fn test_rejects_non_finite_harmonizer() {
        let mut config = SearchConfig::default();
        config.harmonizer.weights.rhythmic = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.harmonizer.learning_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_progress_interval() {
        let mut config = SearchConfig::default();
        config.inverse.progress_interval = 0;
        assert!(config.validate().is_err());
    }
}
