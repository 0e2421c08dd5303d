//! Operator traits
//!
//! This module defines the core operator traits for genetic algorithms.
//! Operators always apply; the driver decides how often to call them.

use rand::Rng;

use crate::error::{OperatorError, OperatorResult};
use crate::fitness::traits::FitnessValue;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;

/// Selection operator trait
///
/// Picks individuals from a population for reproduction, comparing them
/// with the fitness value's own notion of "better".
pub trait SelectionOperator<G, F>: Send + Sync
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Select a single individual, returning its index
    fn select<R: Rng>(
        &self,
        population: &[Individual<G, F>],
        rng: &mut R,
    ) -> Result<usize, OperatorError>;

    /// Select `count` individuals independently
    fn select_many<R: Rng>(
        &self,
        population: &[Individual<G, F>],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, OperatorError> {
        (0..count).map(|_| self.select(population, rng)).collect()
    }
}

/// Crossover operator trait
///
/// Combines genetic material from two parents to create two offspring.
pub trait CrossoverOperator<G: EvolutionaryGenome>: Send + Sync {
    /// Apply crossover to two parents and produce two offspring
    fn crossover<R: Rng>(&self, parent1: &G, parent2: &G, rng: &mut R) -> OperatorResult<(G, G)>;
}

/// Mutation operator trait
///
/// Applies random changes to a genome in place.
pub trait MutationOperator<G: EvolutionaryGenome>: Send + Sync {
    /// Apply mutation to a genome in place
    fn mutate<R: Rng>(&self, genome: &mut G, rng: &mut R);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::real_vector::RealVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FirstSelection;

    impl SelectionOperator<RealVector, f64> for FirstSelection {
        fn select<R: Rng>(
            &self,
            population: &[Individual<RealVector, f64>],
            _rng: &mut R,
        ) -> Result<usize, OperatorError> {
            if population.is_empty() {
                Err(OperatorError::InvalidConfiguration("empty".to_string()))
            } else {
                Ok(0)
            }
        }
    }

    struct SwapCrossover;

    impl CrossoverOperator<RealVector> for SwapCrossover {
        fn crossover<R: Rng>(
            &self,
            parent1: &RealVector,
            parent2: &RealVector,
            _rng: &mut R,
        ) -> OperatorResult<(RealVector, RealVector)> {
            OperatorResult::Success((parent2.clone(), parent1.clone()))
        }
    }

    #[test]
    fn test_select_many_default() {
        let mut rng = StdRng::seed_from_u64(0);
        let population: Vec<Individual<RealVector>> = (0..4)
            .map(|i| Individual::with_fitness(RealVector::new(vec![i as f64]), i as f64))
            .collect();

        let picked = FirstSelection.select_many(&population, 6, &mut rng).unwrap();
        assert_eq!(picked, vec![0; 6]);
    }

    #[test]
    fn test_select_many_propagates_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: Vec<Individual<RealVector>> = Vec::new();
        assert!(FirstSelection.select_many(&empty, 2, &mut rng).is_err());
        assert_eq!(
            FirstSelection.select_many(&empty, 0, &mut rng).unwrap(),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn test_crossover_result() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = RealVector::new(vec![1.0]);
        let b = RealVector::new(vec![2.0]);
        let (c1, c2) = SwapCrossover.crossover(&a, &b, &mut rng).genome().unwrap();
        assert_eq!(c1, b);
        assert_eq!(c2, a);
    }
}
