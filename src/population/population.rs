//! Population type
//!
//! This module provides the Population container type.

use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fitness::traits::{Fitness, FitnessValue};
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;
use crate::population::initializer::Initializer;

/// A population of individuals
#[derive(Clone, Debug)]
pub struct Population<G, F = f64>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    individuals: Vec<Individual<G, F>>,
    generation: usize,
}

impl<G, F> Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
            generation: 0,
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<G, F>>) -> Self {
        Self {
            individuals,
            generation: 0,
        }
    }

    /// Create a random, unevaluated population
    pub fn random<I, R>(size: usize, initializer: &I, rng: &mut R) -> Self
    where
        I: Initializer<G>,
        R: Rng,
    {
        let individuals = (0..size)
            .map(|_| Individual::new(initializer.initialize(rng)))
            .collect();
        Self::from_individuals(individuals)
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Set the generation number
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual<G, F>> {
        self.individuals.get(index)
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual<G, F>> {
        self.individuals.iter()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[Individual<G, F>] {
        &self.individuals
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<Individual<G, F>> {
        self.individuals
    }

    /// Best evaluated individual. Ties go to the earliest one.
    pub fn best(&self) -> Option<&Individual<G, F>> {
        self.individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .fold(None, |best: Option<&Individual<G, F>>, candidate| match best {
                Some(current) if !candidate.is_better_than(current) => Some(current),
                _ => Some(candidate),
            })
    }

    /// Check if all individuals have been evaluated
    pub fn all_evaluated(&self) -> bool {
        self.individuals.iter().all(|i| i.is_evaluated())
    }

    /// Count the number of evaluated individuals
    pub fn count_evaluated(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_evaluated()).count()
    }

    /// Raw fitness values of the evaluated individuals, in population order
    pub fn fitness_values(&self) -> Vec<f64> {
        self.individuals
            .iter()
            .filter_map(Individual::fitness_f64)
            .collect()
    }

    /// Position of the first individual whose fitness is not a finite number
    pub fn first_non_finite(&self) -> Option<usize> {
        self.individuals
            .iter()
            .position(|i| i.fitness().map_or(false, |f| !f.is_finite()))
    }

    /// Evaluate every individual without a cached fitness. Returns the
    /// number of evaluations performed.
    pub fn evaluate<Fit>(&mut self, fitness: &Fit) -> usize
    where
        Fit: Fitness<Genome = G, Value = F>,
    {
        let mut evaluations = 0;
        for individual in &mut self.individuals {
            if !individual.is_evaluated() {
                let f = fitness.evaluate(&individual.genome);
                individual.set_fitness(f);
                evaluations += 1;
            }
        }
        evaluations
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl<G, F> Population<G, F>
where
    G: EvolutionaryGenome + Send + Sync,
    F: FitnessValue + Send,
{
    /// Evaluate every individual without a cached fitness across threads.
    /// Returns the number of evaluations performed.
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit) -> usize
    where
        Fit: Fitness<Genome = G, Value = F> + Sync,
    {
        self.individuals
            .par_iter_mut()
            .filter(|i| !i.is_evaluated())
            .map(|individual| {
                let f = fitness.evaluate(&individual.genome);
                individual.set_fitness(f);
                1
            })
            .sum()
    }
}

/// Sequential fallback for parallel evaluation (when `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
impl<G, F> Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Evaluate every individual without a cached fitness (sequential fallback)
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit) -> usize
    where
        Fit: Fitness<Genome = G, Value = F>,
    {
        self.evaluate(fitness)
    }
}

impl<G, F> Default for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, F> std::ops::Index<usize> for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    type Output = Individual<G, F>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<G, F> FromIterator<Individual<G, F>> for Population<G, F>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    fn from_iter<I: IntoIterator<Item = Individual<G, F>>>(iter: I) -> Self {
        Self::from_individuals(iter.into_iter().collect())
    }
}
