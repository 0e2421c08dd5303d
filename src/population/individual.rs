//! Individual wrapper type
//!
//! An individual pairs a genome with its cached fitness. The cache is
//! cleared whenever variation touches the genome, so only changed
//! individuals are scored again.

use serde::{Deserialize, Serialize};

use crate::fitness::traits::FitnessValue;
use crate::genome::traits::EvolutionaryGenome;

/// An individual in the population
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Individual<G, F = f64>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// The genome of this individual
    pub genome: G,
    /// The fitness value (None if not yet evaluated or invalidated)
    pub fitness: Option<F>,
}

impl<G, F> Individual<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Create a new individual with an unevaluated genome
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Create a new individual with a known fitness
    pub fn with_fitness(genome: G, fitness: F) -> Self {
        Self {
            genome,
            fitness: Some(fitness),
        }
    }

    /// Check if this individual has a valid cached fitness
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// The cached fitness value, if any
    pub fn fitness(&self) -> Option<&F> {
        self.fitness.as_ref()
    }

    /// The cached fitness as f64, if any
    pub fn fitness_f64(&self) -> Option<f64> {
        self.fitness.as_ref().map(FitnessValue::to_f64)
    }

    /// Set the fitness value
    pub fn set_fitness(&mut self, fitness: F) {
        self.fitness = Some(fitness);
    }

    /// Drop the cached fitness after the genome changed
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Take the genome out of this individual
    pub fn into_genome(self) -> G {
        self.genome
    }

    /// Get a reference to the genome
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Get a mutable reference to the genome
    pub fn genome_mut(&mut self) -> &mut G {
        &mut self.genome
    }

    /// Check if this individual is better than another.
    /// An evaluated individual beats an unevaluated one.
    pub fn is_better_than(&self, other: &Self) -> bool {
        match (&self.fitness, &other.fitness) {
            (Some(f1), Some(f2)) => f1.is_better_than(f2),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl<G, F> PartialEq for Individual<G, F>
where
    G: EvolutionaryGenome + PartialEq,
    F: FitnessValue + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.genome == other.genome && self.fitness == other.fitness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::Cost;
    use crate::genome::real_vector::RealVector;

    #[test]
    fn test_new_is_unevaluated() {
        let ind: Individual<RealVector> = Individual::new(RealVector::new(vec![1.0, 2.0]));
        assert!(!ind.is_evaluated());
        assert_eq!(ind.fitness(), None);
        assert_eq!(ind.fitness_f64(), None);
    }

    #[test]
    fn test_set_and_invalidate() {
        let mut ind: Individual<RealVector> = Individual::new(RealVector::new(vec![1.0]));
        ind.set_fitness(3.5);
        assert_eq!(ind.fitness_f64(), Some(3.5));

        ind.invalidate();
        assert!(!ind.is_evaluated());
        assert_eq!(ind.fitness(), None);
    }

    #[test]
    fn test_is_better_than_respects_direction() {
        let a = Individual::with_fitness(RealVector::new(vec![0.0]), 10.0);
        let b = Individual::with_fitness(RealVector::new(vec![0.0]), 5.0);
        assert!(a.is_better_than(&b));

        let low = Individual::with_fitness(RealVector::new(vec![0.0]), Cost(0.1));
        let high = Individual::with_fitness(RealVector::new(vec![0.0]), Cost(0.9));
        assert!(low.is_better_than(&high));
        assert!(!high.is_better_than(&low));
    }

    #[test]
    fn test_evaluated_beats_unevaluated() {
        let a = Individual::with_fitness(RealVector::new(vec![0.0]), -100.0);
        let b: Individual<RealVector> = Individual::new(RealVector::new(vec![0.0]));
        assert!(a.is_better_than(&b));
        assert!(!b.is_better_than(&a));
    }

    #[test]
    fn test_clone_is_deep() {
        let original: Individual<RealVector> = Individual::new(RealVector::new(vec![1.0, 2.0]));
        let mut copy = original.clone();
        copy.genome_mut()[0] = 50.0;
        assert_eq!(original.genome()[0], 1.0);
    }
}
