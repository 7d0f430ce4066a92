//! Best-ever accumulator

use crate::cuboid::{EntropyScore, ScoredCandidate};

/// Lowest-entropy candidate seen so far
///
/// Updated by value: [`BestRecord::consider`] returns the next record and
/// never touches the old one. The entropy it reports never increases.
/// Ties keep the earlier candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestRecord {
    best: Option<ScoredCandidate>,
}

impl BestRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn starting_at(scored: ScoredCandidate) -> Self {
        BestRecord { best: Some(scored) }
    }

    /// Record after seeing `scored`
    #[must_use]
    pub fn consider(self, scored: ScoredCandidate) -> Self {
        match self.best {
            Some(current) if !scored.improves_on(&current) => self,
            _ => BestRecord { best: Some(scored) },
        }
    }

    pub fn best(&self) -> Option<ScoredCandidate> {
        self.best
    }

    /// Entropy of the record, [`EntropyScore::INVALID`] while empty
    pub fn entropy(&self) -> EntropyScore {
        self.best
            .map(|b| b.entropy)
            .unwrap_or(EntropyScore::INVALID)
    }

    pub fn is_perfect(&self) -> bool {
        self.entropy().is_perfect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuboid::Candidate;

    #[test]
    fn test_first_candidate_always_taken() {
        let worst = Candidate::new(0, 0, 0).scored();
        let record = BestRecord::empty().consider(worst);
        assert_eq!(record.best(), Some(worst));
    }

    #[test]
    fn test_never_regresses() {
        let euler = Candidate::new(44, 117, 240).scored();
        let cube = Candidate::new(1, 1, 1).scored();

        let record = BestRecord::empty().consider(euler).consider(cube);
        assert_eq!(record.best(), Some(euler));
        assert_eq!(record.entropy().value(), 1);
    }

    #[test]
    fn test_ties_keep_earlier() {
        let first = Candidate::new(1, 1, 1).scored();
        let second = Candidate::new(2, 2, 2).scored();
        let record = BestRecord::starting_at(first).consider(second);
        assert_eq!(record.best(), Some(first));
    }
}
