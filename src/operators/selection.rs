//! Selection operators
//!
//! Tournament selection shared by the vector and tree searches.

use rand::Rng;

use crate::error::OperatorError;
use crate::fitness::traits::FitnessValue;
use crate::genome::traits::EvolutionaryGenome;
use crate::operators::traits::SelectionOperator;
use crate::population::individual::Individual;

/// Tournament selection operator
///
/// Draws `tournament_size` contestants uniformly with replacement and returns
/// the best of them. Ties go to the contestant drawn first.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Tournament size (number of individuals competing)
    pub tournament_size: usize,
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size
    ///
    /// # Panics
    /// Panics if `tournament_size` is zero
    pub fn new(tournament_size: usize) -> Self {
        assert!(tournament_size >= 1, "Tournament size must be at least 1");
        Self { tournament_size }
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self::new(3)
    }
}

impl<G, F> SelectionOperator<G, F> for TournamentSelection
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    fn select<R: Rng>(
        &self,
        population: &[Individual<G, F>],
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        if population.is_empty() {
            return Err(OperatorError::InvalidConfiguration(
                "cannot select from an empty population".to_string(),
            ));
        }

        let mut winner = rng.gen_range(0..population.len());
        for _ in 1..self.tournament_size {
            let challenger = rng.gen_range(0..population.len());
            if population[challenger].is_better_than(&population[winner]) {
                winner = challenger;
            }
        }
        Ok(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::Cost;
    use crate::genome::real_vector::RealVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(fitnesses: &[f64]) -> Vec<Individual<RealVector>> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| Individual::with_fitness(RealVector::new(vec![i as f64]), f))
            .collect()
    }

    #[test]
    #[should_panic(expected = "Tournament size must be at least 1")]
    fn test_zero_size_rejected() {
        TournamentSelection::new(0);
    }

    #[test]
    fn test_empty_population_is_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<Individual<RealVector>> = Vec::new();
        assert!(TournamentSelection::new(3).select(&empty, &mut rng).is_err());
    }

    #[test]
    fn test_tournament_prefers_better() {
        let mut rng = StdRng::seed_from_u64(42);
        let pop = population(&(0..10).map(f64::from).collect::<Vec<_>>());
        let selection = TournamentSelection::new(3);

        let picks = selection.select_many(&pop, 2000, &mut rng).unwrap();
        let mean = picks.iter().sum::<usize>() as f64 / picks.len() as f64;
        // Uniform picks would average 4.5
        assert!(mean > 5.5, "mean index {}", mean);
    }

    #[test]
    fn test_tournament_minimises_cost() {
        let mut rng = StdRng::seed_from_u64(42);
        let pop: Vec<Individual<RealVector, Cost>> = (0..10)
            .map(|i| Individual::with_fitness(RealVector::new(vec![i as f64]), Cost(i as f64)))
            .collect();

        let picks = TournamentSelection::new(3)
            .select_many(&pop, 2000, &mut rng)
            .unwrap();
        let mean = picks.iter().sum::<usize>() as f64 / picks.len() as f64;
        assert!(mean < 3.5, "mean index {}", mean);
    }

    #[test]
    fn test_size_one_is_uniform() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = population(&[0.0, 100.0, 1.0, 50.0, 2.0]);
        let selection = TournamentSelection::new(1);

        let mut counts = [0usize; 5];
        for idx in selection.select_many(&pop, 10_000, &mut rng).unwrap() {
            counts[idx] += 1;
        }
        for count in counts {
            assert!((1700..=2300).contains(&count), "counts {:?}", counts);
        }
    }

    #[test]
    fn test_samples_with_replacement() {
        // A tournament larger than the population still works
        let mut rng = StdRng::seed_from_u64(3);
        let pop = population(&[1.0, 2.0]);
        let idx = TournamentSelection::new(10).select(&pop, &mut rng).unwrap();
        assert!(idx < 2);
    }
}
