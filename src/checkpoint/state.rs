//! Run record structures
//!
//! The durable output of a finished run: its best genome and fitness plus
//! the full per-generation statistics.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{EvolutionResult, StatisticsLog};
use crate::fitness::traits::FitnessValue;
use crate::genome::traits::EvolutionaryGenome;

/// Current record format version
pub const RECORD_VERSION: u32 = 1;

/// Outcome of one run, ready to be written to disk
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RunRecord<G, F = f64>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Schema version for forward compatibility
    pub version: u32,
    /// Free-form run label
    pub label: String,
    /// Fitness of the best genome
    pub best_fitness: F,
    /// Best genome found
    pub best_genome: G,
    /// Statistics history, starting with generation 0
    pub statistics: StatisticsLog,
}

impl<G, F> RunRecord<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Create a record
    pub fn new(label: impl Into<String>, best_genome: G, best_fitness: F) -> Self {
        Self {
            version: RECORD_VERSION,
            label: label.into(),
            best_fitness,
            best_genome,
            statistics: StatisticsLog::new(),
        }
    }

    /// Capture the durable outputs of a finished run
    pub fn from_result(label: impl Into<String>, result: &EvolutionResult<G, F>) -> Self {
        Self {
            statistics: result.statistics.clone(),
            ..Self::new(
                label,
                result.best_genome.clone(),
                result.best_fitness.clone(),
            )
        }
    }

    /// Attach a statistics history
    pub fn with_statistics(mut self, statistics: StatisticsLog) -> Self {
        self.statistics = statistics;
        self
    }

    /// Whether this build can read the record
    pub fn is_compatible(&self) -> bool {
        self.version <= RECORD_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::GenerationStats;
    use crate::fitness::traits::Cost;
    use crate::genome::real_vector::RealVector;

    #[test]
    fn test_new_record() {
        let record = RunRecord::new("weights", RealVector::new(vec![0.1, 0.2]), 3.5);
        assert_eq!(record.version, RECORD_VERSION);
        assert_eq!(record.label, "weights");
        assert!(record.statistics.is_empty());
        assert!(record.is_compatible());
    }

    #[test]
    fn test_with_statistics() {
        let mut log = StatisticsLog::new();
        log.record(GenerationStats::from_values(&[1.0, 2.0], 0, 2).unwrap());
        let record = RunRecord::new("sr", RealVector::new(vec![1.0]), Cost(0.25))
            .with_statistics(log.clone());
        assert_eq!(record.statistics, log);
        assert_eq!(record.best_fitness, Cost(0.25));
    }
}
