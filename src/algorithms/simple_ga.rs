//! Simple Genetic Algorithm
//!
//! Generational driver shared by the vector and tree searches. Each
//! generation selects a mating pool the size of the population, varies it
//! (pairwise crossover, then per-individual mutation), scores the changed
//! offspring and replaces the population wholesale. The best individual ever
//! scored lives in a hall of fame outside the population.

use log::{debug, info};
use rand::Rng;

use crate::diagnostics::{EvolutionResult, GenerationStats, StatisticsLog};
use crate::error::EvolutionError;
use crate::fitness::traits::{Fitness, FitnessValue};
use crate::genome::traits::EvolutionaryGenome;
use crate::operators::traits::{CrossoverOperator, MutationOperator, SelectionOperator};
use crate::population::hall_of_fame::HallOfFame;
use crate::population::individual::Individual;
use crate::population::initializer::Initializer;
use crate::population::population::Population;

/// Configuration for the Simple GA
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleGAConfig {
    /// Population size, fixed across generations
    pub population_size: usize,
    /// Number of generations after the initial one
    pub generations: usize,
    /// Probability that a mating pair undergoes crossover
    pub crossover_probability: f64,
    /// Probability that an individual undergoes mutation
    pub mutation_probability: f64,
    /// Number of best-ever individuals to archive
    pub hall_of_fame_size: usize,
    /// Whether to evaluate in parallel
    pub parallel_evaluation: bool,
}

impl Default for SimpleGAConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            crossover_probability: 0.5,
            mutation_probability: 0.2,
            hall_of_fame_size: 1,
            parallel_evaluation: true,
        }
    }
}

impl SimpleGAConfig {
    /// Reject settings the generational loop cannot run with
    pub fn validate(&self) -> Result<(), EvolutionError> {
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "population size must be at least 1".to_string(),
            ));
        }
        for (name, p) in [
            ("crossover", self.crossover_probability),
            ("mutation", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EvolutionError::Configuration(format!(
                    "{} probability {} outside [0, 1]",
                    name, p
                )));
            }
        }
        if self.hall_of_fame_size == 0 {
            return Err(EvolutionError::Configuration(
                "hall of fame size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for SimpleGA
pub struct SimpleGABuilder<G, F, I, S, C, M, Fit>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    config: SimpleGAConfig,
    initializer: Option<I>,
    selection: Option<S>,
    crossover: Option<C>,
    mutation: Option<M>,
    fitness: Option<Fit>,
    _phantom: std::marker::PhantomData<fn() -> (G, F)>,
}

impl<G, F> SimpleGABuilder<G, F, (), (), (), (), ()>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SimpleGAConfig::default(),
            initializer: None,
            selection: None,
            crossover: None,
            mutation: None,
            fitness: None,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, F> Default for SimpleGABuilder<G, F, (), (), (), (), ()>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, F, I, S, C, M, Fit> SimpleGABuilder<G, F, I, S, C, M, Fit>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    /// Replace the whole configuration
    pub fn config(mut self, config: SimpleGAConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the generation budget
    pub fn generations(mut self, generations: usize) -> Self {
        self.config.generations = generations;
        self
    }

    /// Set the crossover probability
    pub fn crossover_probability(mut self, probability: f64) -> Self {
        self.config.crossover_probability = probability;
        self
    }

    /// Set the mutation probability
    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.config.mutation_probability = probability;
        self
    }

    /// Set the hall of fame capacity
    pub fn hall_of_fame_size(mut self, size: usize) -> Self {
        self.config.hall_of_fame_size = size;
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel_evaluation(mut self, enabled: bool) -> Self {
        self.config.parallel_evaluation = enabled;
        self
    }

    /// Set the initializer
    pub fn initializer<NewI>(self, initializer: NewI) -> SimpleGABuilder<G, F, NewI, S, C, M, Fit>
    where
        NewI: Initializer<G>,
    {
        SimpleGABuilder {
            config: self.config,
            initializer: Some(initializer),
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: self.fitness,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Set the selection operator
    pub fn selection<NewS>(self, selection: NewS) -> SimpleGABuilder<G, F, I, NewS, C, M, Fit>
    where
        NewS: SelectionOperator<G, F>,
    {
        SimpleGABuilder {
            config: self.config,
            initializer: self.initializer,
            selection: Some(selection),
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: self.fitness,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Set the crossover operator
    pub fn crossover<NewC>(self, crossover: NewC) -> SimpleGABuilder<G, F, I, S, NewC, M, Fit>
    where
        NewC: CrossoverOperator<G>,
    {
        SimpleGABuilder {
            config: self.config,
            initializer: self.initializer,
            selection: self.selection,
            crossover: Some(crossover),
            mutation: self.mutation,
            fitness: self.fitness,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Set the mutation operator
    pub fn mutation<NewM>(self, mutation: NewM) -> SimpleGABuilder<G, F, I, S, C, NewM, Fit>
    where
        NewM: MutationOperator<G>,
    {
        SimpleGABuilder {
            config: self.config,
            initializer: self.initializer,
            selection: self.selection,
            crossover: self.crossover,
            mutation: Some(mutation),
            fitness: self.fitness,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Set the fitness function
    pub fn fitness<NewFit>(self, fitness: NewFit) -> SimpleGABuilder<G, F, I, S, C, M, NewFit>
    where
        NewFit: Fitness<Genome = G, Value = F>,
    {
        SimpleGABuilder {
            config: self.config,
            initializer: self.initializer,
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: Some(fitness),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, F, I, S, C, M, Fit> SimpleGABuilder<G, F, I, S, C, M, Fit>
where
    G: EvolutionaryGenome + PartialEq,
    F: FitnessValue,
    I: Initializer<G>,
    S: SelectionOperator<G, F>,
    C: CrossoverOperator<G>,
    M: MutationOperator<G>,
    Fit: Fitness<Genome = G, Value = F>,
{
    /// Build the SimpleGA instance
    #[allow(clippy::type_complexity)]
    pub fn build(self) -> Result<SimpleGA<G, F, I, S, C, M, Fit>, EvolutionError> {
        self.config.validate()?;

        let initializer = self.initializer.ok_or_else(|| {
            EvolutionError::Configuration("Initializer must be specified".to_string())
        })?;

        let selection = self.selection.ok_or_else(|| {
            EvolutionError::Configuration("Selection operator must be specified".to_string())
        })?;

        let crossover = self.crossover.ok_or_else(|| {
            EvolutionError::Configuration("Crossover operator must be specified".to_string())
        })?;

        let mutation = self.mutation.ok_or_else(|| {
            EvolutionError::Configuration("Mutation operator must be specified".to_string())
        })?;

        let fitness = self.fitness.ok_or_else(|| {
            EvolutionError::Configuration("Fitness function must be specified".to_string())
        })?;

        Ok(SimpleGA {
            config: self.config,
            initializer,
            selection,
            crossover,
            mutation,
            fitness,
            _phantom: std::marker::PhantomData,
        })
    }
}

/// Simple Genetic Algorithm
pub struct SimpleGA<G, F, I, S, C, M, Fit>
where
    G: EvolutionaryGenome,
    F: FitnessValue,
{
    config: SimpleGAConfig,
    initializer: I,
    selection: S,
    crossover: C,
    mutation: M,
    fitness: Fit,
    _phantom: std::marker::PhantomData<fn() -> (G, F)>,
}

impl<G, F, I, S, C, M, Fit> SimpleGA<G, F, I, S, C, M, Fit>
where
    G: EvolutionaryGenome + PartialEq,
    F: FitnessValue,
    I: Initializer<G>,
    S: SelectionOperator<G, F>,
    C: CrossoverOperator<G>,
    M: MutationOperator<G>,
    Fit: Fitness<Genome = G, Value = F>,
{
    /// Create a builder for SimpleGA
    pub fn builder() -> SimpleGABuilder<G, F, (), (), (), (), ()> {
        SimpleGABuilder::new()
    }

    /// The configuration this instance runs with
    pub fn config(&self) -> &SimpleGAConfig {
        &self.config
    }

    /// The fitness function
    pub fn fitness(&self) -> &Fit {
        &self.fitness
    }

    /// Run the genetic algorithm to the end of its generation budget
    pub fn run<R: Rng>(&self, rng: &mut R) -> Result<EvolutionResult<G, F>, EvolutionError> {
        info!(
            "starting generational run: population {}, {} generations, cxpb {}, mutpb {}",
            self.config.population_size,
            self.config.generations,
            self.config.crossover_probability,
            self.config.mutation_probability
        );

        let mut population: Population<G, F> =
            Population::random(self.config.population_size, &self.initializer, rng);
        let mut hall_of_fame = HallOfFame::new(self.config.hall_of_fame_size)?;
        let mut statistics = StatisticsLog::new();
        let mut best_history = Vec::with_capacity(self.config.generations + 1);

        let evaluations = self.evaluate(&mut population)?;
        let mut total_evaluations = evaluations;
        self.record_generation(
            &population,
            evaluations,
            &mut hall_of_fame,
            &mut statistics,
            &mut best_history,
        )?;

        for generation in 1..=self.config.generations {
            let offspring = self.vary(&population, rng)?;
            population = Population::from_individuals(offspring);
            population.set_generation(generation);

            let evaluations = self.evaluate(&mut population)?;
            total_evaluations += evaluations;
            self.record_generation(
                &population,
                evaluations,
                &mut hall_of_fame,
                &mut statistics,
                &mut best_history,
            )?;
        }

        let best = hall_of_fame
            .best()
            .cloned()
            .ok_or(EvolutionError::EmptyPopulation)?;
        let best_fitness = best.fitness.ok_or(EvolutionError::EmptyPopulation)?;

        info!(
            "run finished after {} generations, {} evaluations; best fitness {:?}",
            self.config.generations, total_evaluations, best_fitness
        );

        Ok(EvolutionResult {
            best_genome: best.genome,
            best_fitness,
            generations: self.config.generations,
            evaluations: total_evaluations,
            statistics,
            best_history,
            final_population: population,
        })
    }

    /// Select a mating pool and apply crossover and mutation to it. Only
    /// individuals touched by an operator lose their cached fitness.
    fn vary<R: Rng>(
        &self,
        population: &Population<G, F>,
        rng: &mut R,
    ) -> Result<Vec<Individual<G, F>>, EvolutionError> {
        let pool = self
            .selection
            .select_many(population.individuals(), population.len(), rng)?;
        let mut offspring: Vec<Individual<G, F>> =
            pool.into_iter().map(|i| population[i].clone()).collect();

        for i in (1..offspring.len()).step_by(2) {
            if rng.gen::<f64>() < self.config.crossover_probability {
                let (child1, child2) = self
                    .crossover
                    .crossover(&offspring[i - 1].genome, &offspring[i].genome, rng)
                    .into_result()?;
                offspring[i - 1].genome = child1;
                offspring[i].genome = child2;
                offspring[i - 1].invalidate();
                offspring[i].invalidate();
            }
        }

        for individual in offspring.iter_mut() {
            if rng.gen::<f64>() < self.config.mutation_probability {
                self.mutation.mutate(&mut individual.genome, rng);
                individual.invalidate();
            }
        }

        Ok(offspring)
    }

    /// Score every unevaluated individual and reject unusable fitness values
    fn evaluate(&self, population: &mut Population<G, F>) -> Result<usize, EvolutionError> {
        let evaluations = if self.config.parallel_evaluation {
            population.evaluate_parallel(&self.fitness)
        } else {
            population.evaluate(&self.fitness)
        };

        if let Some(index) = population.first_non_finite() {
            return Err(EvolutionError::FitnessEvaluation {
                generation: population.generation(),
                index,
                message: format!(
                    "fitness {:?} is not a finite number",
                    population[index].fitness()
                ),
            });
        }
        Ok(evaluations)
    }

    fn record_generation(
        &self,
        population: &Population<G, F>,
        evaluations: usize,
        hall_of_fame: &mut HallOfFame<G, F>,
        statistics: &mut StatisticsLog,
        best_history: &mut Vec<F>,
    ) -> Result<(), EvolutionError> {
        hall_of_fame.update(population.iter());

        let stats = GenerationStats::from_population(population, population.generation(), evaluations)
            .ok_or(EvolutionError::EmptyPopulation)?;
        debug!(
            "generation {}: evaluations {}, min {:.6}, max {:.6}, mean {:.6}, std {:.6}",
            stats.generation, stats.evaluations, stats.min, stats.max, stats.mean, stats.std
        );
        statistics.record(stats);

        let best = hall_of_fame
            .best()
            .and_then(|b| b.fitness.clone())
            .ok_or(EvolutionError::EmptyPopulation)?;
        best_history.push(best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::{Cost, FnFitness};
    use crate::genome::bounds::{Bounds, MultiBounds};
    use crate::genome::real_vector::RealVector;
    use crate::genome::traits::RealValuedGenome;
    use crate::operators::crossover::BlendCrossover;
    use crate::operators::mutation::GaussianMutation;
    use crate::operators::selection::TournamentSelection;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_init(dimension: usize) -> crate::population::initializer::UniformInit {
        crate::population::initializer::UniformInit::new(MultiBounds::uniform(
            Bounds::unit(),
            dimension,
        ))
    }

    fn sum_fitness() -> impl Fitness<Genome = RealVector, Value = f64> {
        FnFitness::new(|g: &RealVector| g.genes().iter().sum::<f64>())
    }

    #[test]
    fn test_simple_ga_builder() {
        let ga = SimpleGABuilder::new()
            .population_size(20)
            .generations(5)
            .initializer(unit_init(4))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(sum_fitness())
            .build();

        assert!(ga.is_ok());
    }

    #[test]
    fn test_simple_ga_rejects_zero_population() {
        let ga = SimpleGABuilder::new()
            .population_size(0)
            .initializer(unit_init(4))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(sum_fitness())
            .build();

        assert!(matches!(ga, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_simple_ga_rejects_bad_probability() {
        let ga = SimpleGABuilder::new()
            .crossover_probability(1.5)
            .initializer(unit_init(4))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(sum_fitness())
            .build();

        assert!(ga.is_err());
        if let Err(e) = ga {
            assert!(e.to_string().contains("crossover probability"));
        }
    }

    #[test]
    fn test_simple_ga_improves_and_never_regresses() {
        let mut rng = StdRng::seed_from_u64(42);
        let ga = SimpleGABuilder::new()
            .population_size(30)
            .generations(25)
            .initializer(unit_init(4))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(sum_fitness())
            .build()
            .unwrap();

        let result = ga.run(&mut rng).unwrap();

        assert_eq!(result.statistics.len(), 26);
        assert_eq!(result.best_history.len(), 26);
        assert_eq!(result.final_population.len(), 30);
        for pair in result.best_history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        let initial_max = result.statistics.records()[0].max;
        assert!(result.best_fitness > initial_max);
        assert_eq!(result.best_fitness, *result.best_history.last().unwrap());
    }

    #[test]
    fn test_simple_ga_minimises_cost() {
        let mut rng = StdRng::seed_from_u64(3);
        let ga = SimpleGABuilder::new()
            .population_size(30)
            .generations(20)
            .initializer(unit_init(2))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(FnFitness::new(|g: &RealVector| {
                Cost(g.genes().iter().map(|x| x * x).sum::<f64>())
            }))
            .build()
            .unwrap();

        let result = ga.run(&mut rng).unwrap();
        for pair in result.best_history.windows(2) {
            assert!(pair[1].0 <= pair[0].0);
        }
        assert!(result.best_fitness.0 <= result.statistics.records()[0].min);
    }

    #[test]
    fn test_zero_generations_records_initial_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let ga = SimpleGABuilder::new()
            .population_size(10)
            .generations(0)
            .initializer(unit_init(4))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(sum_fitness())
            .build()
            .unwrap();

        let result = ga.run(&mut rng).unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.evaluations, 10);
        assert_eq!(result.statistics.len(), 1);
        assert_eq!(result.statistics.records()[0].generation, 0);
    }

    #[test]
    fn test_only_changed_offspring_are_reevaluated() {
        let mut rng = StdRng::seed_from_u64(8);
        let ga = SimpleGABuilder::new()
            .population_size(40)
            .generations(3)
            .crossover_probability(0.0)
            .mutation_probability(0.0)
            .initializer(unit_init(4))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(sum_fitness())
            .build()
            .unwrap();

        let result = ga.run(&mut rng).unwrap();
        let per_generation: Vec<usize> =
            result.statistics.iter().map(|s| s.evaluations).collect();
        assert_eq!(per_generation, vec![40, 0, 0, 0]);
    }

    #[test]
    fn test_non_finite_fitness_aborts_with_context() {
        let mut rng = StdRng::seed_from_u64(5);
        let ga = SimpleGABuilder::new()
            .population_size(10)
            .generations(3)
            .initializer(unit_init(1))
            .selection(TournamentSelection::new(3))
            .crossover(BlendCrossover::default())
            .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
            .fitness(FnFitness::new(|g: &RealVector| {
                if g[0] >= 0.0 {
                    f64::NAN
                } else {
                    g[0]
                }
            }))
            .build()
            .unwrap();

        match ga.run(&mut rng) {
            Err(EvolutionError::FitnessEvaluation {
                generation, index, ..
            }) => {
                assert_eq!(generation, 0);
                assert_eq!(index, 0);
            }
            other => panic!("expected FitnessEvaluation error, got {:?}", other.map(|r| r.best_fitness)),
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let build = || {
            SimpleGABuilder::new()
                .population_size(20)
                .generations(10)
                .initializer(unit_init(4))
                .selection(TournamentSelection::new(3))
                .crossover(BlendCrossover::default())
                .mutation(GaussianMutation::new(0.1, 0.2).unwrap())
                .fitness(sum_fitness())
                .build()
                .unwrap()
        };

        let a = build().run(&mut StdRng::seed_from_u64(77)).unwrap();
        let b = build().run(&mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a.best_genome, b.best_genome);
        assert_eq!(a.statistics, b.statistics);
    }
}
