//! Diagnostics and statistics
//!
//! Per-generation fitness statistics, the append-only log that collects them,
//! and the result record a finished run hands back.

use serde::{Deserialize, Serialize};

use crate::error::CheckpointError;
use crate::fitness::traits::FitnessValue;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::population::Population;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 is the initial population)
    pub generation: usize,
    /// Fitness evaluations performed in this generation
    pub evaluations: usize,
    /// Mean fitness
    pub mean: f64,
    /// Population standard deviation of fitness
    pub std: f64,
    /// Smallest raw fitness value
    pub min: f64,
    /// Largest raw fitness value
    pub max: f64,
}

impl GenerationStats {
    /// Compute statistics over the evaluated members of a population.
    /// Returns `None` if nothing has been evaluated.
    pub fn from_population<G, F>(
        population: &Population<G, F>,
        generation: usize,
        evaluations: usize,
    ) -> Option<Self>
    where
        G: EvolutionaryGenome,
        F: FitnessValue,
    {
        Self::from_values(&population.fitness_values(), generation, evaluations)
    }

    /// Compute statistics over raw fitness values
    pub fn from_values(values: &[f64], generation: usize, evaluations: usize) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            generation,
            evaluations,
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }
}

/// Append-only record of per-generation statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsLog {
    records: Vec<GenerationStats>,
}

impl StatisticsLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.records.push(stats);
    }

    /// All records in generation order
    pub fn records(&self) -> &[GenerationStats] {
        &self.records
    }

    /// Number of recorded generations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no generation has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record
    pub fn last(&self) -> Option<&GenerationStats> {
        self.records.last()
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, GenerationStats> {
        self.records.iter()
    }

    /// Total evaluations across all generations
    pub fn total_evaluations(&self) -> usize {
        self.records.iter().map(|r| r.evaluations).sum()
    }

    /// History of per-generation minima
    pub fn min_history(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.min).collect()
    }

    /// History of per-generation maxima
    pub fn max_history(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.max).collect()
    }

    /// History of per-generation means
    pub fn mean_history(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.mean).collect()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::Deserialization(e.to_string()))
    }

    /// Tab-separated table in the layout `gen nevals avg std min max`
    pub fn to_table(&self) -> String {
        let mut out = String::from("gen\tnevals\tavg\tstd\tmin\tmax\n");
        for r in &self.records {
            out.push_str(&format!(
                "{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\n",
                r.generation, r.evaluations, r.mean, r.std, r.min, r.max
            ));
        }
        out
    }
}

impl<'a> IntoIterator for &'a StatisticsLog {
    type Item = &'a GenerationStats;
    type IntoIter = std::slice::Iter<'a, GenerationStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of an evolution run
#[derive(Clone, Debug)]
pub struct EvolutionResult<G, F = f64>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// The best genome ever evaluated
    pub best_genome: G,
    /// Fitness of the best genome
    pub best_fitness: F,
    /// Number of generations completed after the initial one
    pub generations: usize,
    /// Total fitness evaluations
    pub evaluations: usize,
    /// Per-generation statistics, starting with generation 0
    pub statistics: StatisticsLog,
    /// Best-ever fitness after each generation, starting with generation 0
    pub best_history: Vec<F>,
    /// The last live population
    pub final_population: Population<G, F>,
}

pub mod prelude {
    pub use super::{EvolutionResult, GenerationStats, StatisticsLog};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::real_vector::RealVector;
    use crate::population::individual::Individual;
    use approx::assert_relative_eq;

    fn create_test_population() -> Population<RealVector> {
        let individuals = vec![
            Individual::with_fitness(RealVector::new(vec![1.0]), 10.0),
            Individual::with_fitness(RealVector::new(vec![2.0]), 20.0),
            Individual::with_fitness(RealVector::new(vec![3.0]), 30.0),
            Individual::with_fitness(RealVector::new(vec![4.0]), 40.0),
            Individual::with_fitness(RealVector::new(vec![5.0]), 50.0),
            Individual::new(RealVector::new(vec![6.0])),
        ];
        Population::from_individuals(individuals)
    }

    #[test]
    fn test_generation_stats_from_population() {
        let pop = create_test_population();
        let stats = GenerationStats::from_population(&pop, 10, 5).unwrap();

        assert_eq!(stats.generation, 10);
        assert_eq!(stats.evaluations, 5);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.mean, 30.0);
        // Population variance: 1000 / 5 = 200
        assert_relative_eq!(stats.std, 200f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_generation_stats_single_value() {
        let stats = GenerationStats::from_values(&[3.5], 0, 1).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, 3.5);
        assert_eq!(stats.max, 3.5);
    }

    #[test]
    fn test_generation_stats_empty_population() {
        let pop: Population<RealVector> = Population::new();
        assert!(GenerationStats::from_population(&pop, 0, 0).is_none());
    }

    #[test]
    fn test_statistics_log_history() {
        let mut log = StatisticsLog::new();
        for i in 0..4 {
            log.record(GenerationStats::from_values(&[i as f64, i as f64 * 3.0], i, 2).unwrap());
        }

        assert_eq!(log.len(), 4);
        assert_eq!(log.total_evaluations(), 8);
        assert_eq!(log.min_history(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(log.max_history(), vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(log.mean_history(), vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(log.last().unwrap().generation, 3);
    }

    #[test]
    fn test_statistics_log_json_round_trip() {
        let mut log = StatisticsLog::new();
        log.record(GenerationStats::from_values(&[0.1, 0.2, 0.7], 0, 3).unwrap());
        log.record(GenerationStats::from_values(&[1.0 / 3.0, 2.0 / 3.0], 1, 2).unwrap());

        let json = log.to_json().unwrap();
        let back = StatisticsLog::from_json(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_statistics_log_rejects_garbage() {
        assert!(matches!(
            StatisticsLog::from_json("{not json"),
            Err(CheckpointError::Deserialization(_))
        ));
    }

    #[test]
    fn test_table_layout() {
        let mut log = StatisticsLog::new();
        log.record(GenerationStats::from_values(&[1.0, 3.0], 0, 2).unwrap());
        let table = log.to_table();
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("gen\tnevals\tavg\tstd\tmin\tmax"));
        assert_eq!(
            lines.next(),
            Some("0\t2\t2.000000\t1.000000\t1.000000\t3.000000")
        );
    }
}
