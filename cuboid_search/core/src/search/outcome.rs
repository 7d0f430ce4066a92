//! Search outcomes shared by all three strategies
//!
//! Every run ends in one explicit terminal state. None of them is an error:
//! failing to find a perfect cuboid is the expected, reportable result.

use crate::cuboid::{EntropyScore, ScoredCandidate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors from exporting or reloading an outcome
#[derive(Error, Debug)]
pub enum OutcomeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for outcome export
pub type OutcomeResult<T> = Result<T, OutcomeError>;

/// Which strategy produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Genetic,
    Harmonizer,
    Inverse,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Genetic => "genetic oracle",
            Strategy::Harmonizer => "gradient harmonizer",
            Strategy::Inverse => "inverse reconstructor",
        };
        f.write_str(name)
    }
}

/// Terminal state of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A zero-entropy candidate was found
    Success,

    /// Generation or iteration budget used up
    BudgetExhausted,

    /// Every diagonal combination in the pool was tested
    PoolExhausted,

    /// Stopped early through a [`CancelToken`](super::CancelToken)
    Cancelled,
}

/// Result of one search run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Strategy that ran
    pub strategy: Strategy,

    /// How the run ended
    pub termination: Termination,

    /// Best candidate seen (the solution on success)
    pub best: Option<ScoredCandidate>,

    /// Generations evaluated, iterations performed, or combinations tested
    pub steps: u64,
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        self.termination == Termination::Success
    }

    /// Entropy of the best candidate, or the invalid sentinel if none was seen
    pub fn best_entropy(&self) -> EntropyScore {
        self.best
            .map(|b| b.entropy)
            .unwrap_or(EntropyScore::INVALID)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> OutcomeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> OutcomeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write as pretty JSON to `path`
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> OutcomeResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reload an outcome written by [`SearchOutcome::to_json_file`]
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> OutcomeResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.termination, self.best) {
            (Termination::Success, Some(best)) => {
                write!(
                    f,
                    "{}: perfect cuboid {} after {} steps",
                    self.strategy, best.candidate, self.steps
                )
            }
            (termination, Some(best)) => write!(
                f,
                "{}: {:?} after {} steps, best {}",
                self.strategy, termination, self.steps, best
            ),
            (termination, None) => write!(
                f,
                "{}: {:?} after {} steps, no candidate",
                self.strategy, termination, self.steps
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuboid::Candidate;

    fn euler_outcome() -> SearchOutcome {
        SearchOutcome {
            strategy: Strategy::Inverse,
            termination: Termination::PoolExhausted,
            best: Some(Candidate::new(44, 117, 240).scored()),
            steps: 42,
        }
    }

    #[test]
    fn test_best_entropy_defaults_to_invalid() {
        let outcome = SearchOutcome {
            strategy: Strategy::Genetic,
            termination: Termination::BudgetExhausted,
            best: None,
            steps: 0,
        };
        assert_eq!(outcome.best_entropy(), EntropyScore::INVALID);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_json_shape() {
        let json = euler_outcome().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["strategy"], "inverse");
        assert_eq!(parsed["termination"], "pool_exhausted");
        assert_eq!(parsed["steps"], 42);
        assert_eq!(parsed["best"]["entropy"], 1);
        assert_eq!(parsed["best"]["candidate"]["c"], 240);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SearchOutcome::from_json("{not json"),
            Err(OutcomeError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_entropy() {
        let json = euler_outcome().to_json().unwrap().replace("\"entropy\": 1", "\"entropy\": 9");
        assert!(json.contains("\"entropy\": 9"));
        assert!(matches!(SearchOutcome::from_json(&json), Err(OutcomeError::Json(_))));
    }

    #[test]
    fn test_display() {
        let text = euler_outcome().to_string();
        assert!(text.contains("inverse reconstructor"));
        assert!(text.contains("(44, 117, 240)"));
    }
}
