//! Hall of fame
//!
//! Keeps the best individuals ever evaluated, across all generations,
//! independently of what the live population still holds.

use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;
use crate::fitness::traits::FitnessValue;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;

/// Best-ever archive, ordered best first
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct HallOfFame<G, F = f64>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    capacity: usize,
    members: Vec<Individual<G, F>>,
}

impl<G, F> HallOfFame<G, F>
where
    G: EvolutionaryGenome + PartialEq,
    F: FitnessValue,
{
    /// Create an empty archive holding at most `capacity` individuals
    pub fn new(capacity: usize) -> Result<Self, EvolutionError> {
        if capacity == 0 {
            return Err(EvolutionError::Configuration(
                "hall of fame capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            members: Vec::with_capacity(capacity),
        })
    }

    /// Offer every evaluated individual to the archive. A newcomer enters
    /// only when strictly better than the current worst member (or when
    /// there is room), so members are never displaced by equals. Returns
    /// true if the archive changed.
    pub fn update<'a, I>(&mut self, individuals: I) -> bool
    where
        I: IntoIterator<Item = &'a Individual<G, F>>,
    {
        let mut changed = false;
        for candidate in individuals {
            let Some(fitness) = candidate.fitness() else {
                continue;
            };
            if !fitness.is_finite() {
                continue;
            }
            let full = self.members.len() >= self.capacity;
            if full {
                let admits = self
                    .members
                    .last()
                    .map_or(true, |worst| candidate.is_better_than(worst));
                if !admits {
                    continue;
                }
            }
            if self.members.iter().any(|m| m.genome == candidate.genome) {
                continue;
            }
            if full {
                self.members.pop();
            }
            let slot = self
                .members
                .iter()
                .position(|m| candidate.is_better_than(m))
                .unwrap_or(self.members.len());
            self.members.insert(slot, candidate.clone());
            changed = true;
        }
        changed
    }

    /// The best individual seen so far
    pub fn best(&self) -> Option<&Individual<G, F>> {
        self.members.first()
    }

    /// All members, best first
    pub fn members(&self) -> &[Individual<G, F>] {
        &self.members
    }

    /// Maximum number of members
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing has been archived yet
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::Cost;
    use crate::genome::real_vector::RealVector;

    fn ind(gene: f64, fitness: f64) -> Individual<RealVector> {
        Individual::with_fitness(RealVector::new(vec![gene]), fitness)
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(HallOfFame::<RealVector>::new(0).is_err());
    }

    #[test]
    fn test_single_best_never_regresses() {
        let mut hof = HallOfFame::new(1).unwrap();
        assert!(hof.update(&[ind(1.0, 5.0), ind(2.0, 9.0)]));
        assert_eq!(hof.best().unwrap().fitness_f64(), Some(9.0));

        assert!(!hof.update(&[ind(3.0, 1.0), ind(4.0, 8.9)]));
        assert_eq!(hof.best().unwrap().genome[0], 2.0);

        assert!(hof.update(&[ind(5.0, 9.5)]));
        assert_eq!(hof.best().unwrap().genome[0], 5.0);
        assert_eq!(hof.len(), 1);
    }

    #[test]
    fn test_equal_fitness_keeps_incumbent() {
        let mut hof = HallOfFame::new(1).unwrap();
        hof.update(&[ind(1.0, 5.0)]);
        assert!(!hof.update(&[ind(2.0, 5.0)]));
        assert_eq!(hof.best().unwrap().genome[0], 1.0);
    }

    #[test]
    fn test_orders_members_and_skips_duplicates() {
        let mut hof = HallOfFame::new(3).unwrap();
        hof.update(&[ind(1.0, 1.0), ind(2.0, 3.0), ind(2.0, 3.0), ind(3.0, 2.0), ind(4.0, 0.5)]);
        let genes: Vec<f64> = hof.members().iter().map(|m| m.genome[0]).collect();
        assert_eq!(genes, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_ignores_unevaluated_and_non_finite() {
        let mut hof = HallOfFame::new(1).unwrap();
        let unevaluated: Individual<RealVector> = Individual::new(RealVector::new(vec![0.0]));
        assert!(!hof.update(&[unevaluated, ind(1.0, f64::NAN)]));
        assert!(hof.is_empty());
    }

    #[test]
    fn test_minimising_archive() {
        let mut hof: HallOfFame<RealVector, Cost> = HallOfFame::new(1).unwrap();
        hof.update(&[
            Individual::with_fitness(RealVector::new(vec![1.0]), Cost(0.4)),
            Individual::with_fitness(RealVector::new(vec![2.0]), Cost(0.2)),
            Individual::with_fitness(RealVector::new(vec![3.0]), Cost(0.3)),
        ]);
        assert_eq!(hof.best().unwrap().fitness(), Some(&Cost(0.2)));
    }
}
