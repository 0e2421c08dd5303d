//! Symbolic regression of traffic counts
//!
//! Evolves an arithmetic expression of one input (inbound vehicle counts)
//! that predicts a paired output series (outbound counts). Fitness is the
//! training RMSE plus a per-node complexity penalty, minimised.

use std::sync::Arc;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::algorithms::simple_ga::SimpleGABuilder;
use crate::config::{EvolutionConfig, GenomeVariant, TreeConfig};
use crate::diagnostics::EvolutionResult;
use crate::error::EvolutionError;
use crate::fitness::traits::{Cost, Fitness};
use crate::genome::primitives::PrimitiveSet;
use crate::genome::tree::TreeGenome;
use crate::operators::crossover::OnePointSubtreeCrossover;
use crate::operators::mutation::UniformSubtreeMutation;
use crate::operators::selection::TournamentSelection;
use crate::population::initializer::HalfAndHalfInit;

/// Name given to the single input variable
pub const INPUT_NAME: &str = "inbound_vehicles";

/// Share of rows held out for validation
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Seed of the train/validation shuffle
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Squared error charged for a sample whose prediction is not a finite number
pub const NON_FINITE_PENALTY: f64 = 1e6;

/// Training and validation pairs of `(input, target)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionDataset {
    train: Vec<(f64, f64)>,
    validation: Vec<(f64, f64)>,
}

impl RegressionDataset {
    /// Use every pair for training, with no validation split
    pub fn from_pairs(pairs: Vec<(f64, f64)>) -> Result<Self, EvolutionError> {
        Self::new(pairs, Vec::new())
    }

    /// Wrap an existing split. The training part must not be empty.
    pub fn new(
        train: Vec<(f64, f64)>,
        validation: Vec<(f64, f64)>,
    ) -> Result<Self, EvolutionError> {
        if train.is_empty() {
            return Err(EvolutionError::EmptyDataset);
        }
        if let Some((x, y)) = train
            .iter()
            .chain(&validation)
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(EvolutionError::InvalidDataset(format!(
                "pair ({}, {}) is not finite",
                x, y
            )));
        }
        Ok(Self { train, validation })
    }

    /// Normalise both series and split them with the default ratio and seed
    pub fn prepare(inputs: &[f64], targets: &[f64]) -> Result<Self, EvolutionError> {
        Self::prepare_with(inputs, targets, DEFAULT_TEST_RATIO, DEFAULT_SPLIT_SEED)
    }

    /// Check lengths, z-score both series, then split into training and
    /// validation rows
    pub fn prepare_with(
        inputs: &[f64],
        targets: &[f64],
        test_ratio: f64,
        seed: u64,
    ) -> Result<Self, EvolutionError> {
        if inputs.len() != targets.len() {
            return Err(EvolutionError::DatasetMismatch {
                what: "inbound/outbound series".to_string(),
                left: inputs.len(),
                right: targets.len(),
            });
        }
        if inputs.is_empty() {
            return Err(EvolutionError::EmptyDataset);
        }

        let inputs = z_score(inputs);
        let targets = z_score(targets);
        let (train_idx, val_idx) = split_indices(inputs.len(), test_ratio, seed)?;

        let pick = |idx: &[usize]| -> Vec<(f64, f64)> {
            idx.iter().map(|&i| (inputs[i], targets[i])).collect()
        };
        let dataset = Self::new(pick(&train_idx), pick(&val_idx))?;
        info!(
            "prepared {} training and {} validation pairs",
            dataset.train.len(),
            dataset.validation.len()
        );
        Ok(dataset)
    }

    pub fn train(&self) -> &[(f64, f64)] {
        &self.train
    }

    pub fn validation(&self) -> &[(f64, f64)] {
        &self.validation
    }
}

/// Standardise to zero mean and unit sample standard deviation. A series
/// with fewer than two values or no spread is only centred.
pub fn z_score(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    if std == 0.0 || !std.is_finite() {
        warn!("series of {} values has no spread; centring only", values.len());
        return values.iter().map(|v| v - mean).collect();
    }
    values.iter().map(|v| (v - mean) / std).collect()
}

/// Shuffle `0..n` with a seeded generator; the first `ceil(n * test_ratio)`
/// indices form the validation part, the rest the training part.
pub fn split_indices(
    n: usize,
    test_ratio: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), EvolutionError> {
    if !(0.0..1.0).contains(&test_ratio) {
        return Err(EvolutionError::Configuration(format!(
            "test ratio {} outside [0, 1)",
            test_ratio
        )));
    }
    let n_test = (n as f64 * test_ratio).ceil() as usize;
    if n_test >= n {
        return Err(EvolutionError::InvalidDataset(format!(
            "{} rows leave nothing to train on at test ratio {}",
            n, test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = indices.split_off(n_test);
    Ok((train, indices))
}

/// The arithmetic registry with the input renamed and constants drawn from
/// the configured range
pub fn traffic_primitives(tree: &TreeConfig) -> Result<PrimitiveSet, EvolutionError> {
    let mut set = PrimitiveSet::arithmetic(1).with_ephemeral_constant(tree.erc_min, tree.erc_max)?;
    set.rename_argument(0, INPUT_NAME)?;
    Ok(set)
}

/// Penalised RMSE of an expression over training pairs
#[derive(Clone, Debug)]
pub struct SymbolicRegressionFitness {
    primitives: Arc<PrimitiveSet>,
    samples: Arc<[(f64, f64)]>,
    complexity_penalty: f64,
}

impl SymbolicRegressionFitness {
    /// Score against `samples`, which must not be empty
    pub fn new(
        primitives: Arc<PrimitiveSet>,
        samples: &[(f64, f64)],
        complexity_penalty: f64,
    ) -> Result<Self, EvolutionError> {
        if samples.is_empty() {
            return Err(EvolutionError::EmptyDataset);
        }
        Ok(Self {
            primitives,
            samples: samples.into(),
            complexity_penalty,
        })
    }

    /// Root-mean-square error over the samples
    pub fn rmse(&self, genome: &TreeGenome) -> f64 {
        let total: f64 = self
            .samples
            .iter()
            .map(|&(x, y)| {
                let err = (genome.evaluate(&self.primitives, &[x]) - y).powi(2);
                if err.is_finite() {
                    err
                } else {
                    NON_FINITE_PENALTY
                }
            })
            .sum();
        (total / self.samples.len() as f64).sqrt()
    }
}

impl Fitness for SymbolicRegressionFitness {
    type Genome = TreeGenome;
    type Value = Cost;

    fn evaluate(&self, genome: &TreeGenome) -> Cost {
        Cost(self.rmse(genome) + self.complexity_penalty * genome.size() as f64)
    }
}

/// Prediction quality on held-out pairs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub samples: usize,
    pub rmse: f64,
    /// Mean of `|pred - actual| / |actual| * 100`; zero actuals are skipped,
    /// `None` when every actual is zero
    pub mean_percentage_error: Option<f64>,
}

impl ValidationReport {
    /// Compare predictions with actual values pairwise
    pub fn from_predictions(predictions: &[f64], actuals: &[f64]) -> Result<Self, EvolutionError> {
        if predictions.len() != actuals.len() {
            return Err(EvolutionError::DatasetMismatch {
                what: "predictions/actuals".to_string(),
                left: predictions.len(),
                right: actuals.len(),
            });
        }
        if actuals.is_empty() {
            return Err(EvolutionError::EmptyDataset);
        }

        let n = actuals.len() as f64;
        let mse = predictions
            .iter()
            .zip(actuals)
            .map(|(p, a)| (p - a).powi(2))
            .sum::<f64>()
            / n;

        let percentages: Vec<f64> = predictions
            .iter()
            .zip(actuals)
            .filter(|(_, a)| **a != 0.0)
            .map(|(p, a)| (p - a).abs() / a.abs() * 100.0)
            .collect();
        let mean_percentage_error = (!percentages.is_empty())
            .then(|| percentages.iter().sum::<f64>() / percentages.len() as f64);

        Ok(Self {
            samples: actuals.len(),
            rmse: mse.sqrt(),
            mean_percentage_error,
        })
    }
}

/// A finished regression run together with the registry its trees use
#[derive(Clone, Debug)]
pub struct FittedExpression {
    pub primitives: Arc<PrimitiveSet>,
    pub result: EvolutionResult<TreeGenome, Cost>,
}

impl FittedExpression {
    /// Best expression found
    pub fn best(&self) -> &TreeGenome {
        &self.result.best_genome
    }

    /// Predict one output
    pub fn predict(&self, input: f64) -> f64 {
        self.result.best_genome.evaluate(&self.primitives, &[input])
    }

    /// Prefix rendering such as `add(mul(inbound_vehicles, 2), 0.1)`
    pub fn expression(&self) -> String {
        self.result.best_genome.display(&self.primitives).to_string()
    }

    /// Score the best expression on the validation pairs
    pub fn validate(&self, dataset: &RegressionDataset) -> Result<ValidationReport, EvolutionError> {
        let (inputs, actuals): (Vec<f64>, Vec<f64>) = dataset.validation().iter().copied().unzip();
        let predictions: Vec<f64> = inputs.iter().map(|&x| self.predict(x)).collect();
        ValidationReport::from_predictions(&predictions, &actuals)
    }
}

/// Evolve an expression for the training part of `dataset` under a
/// tree-variant configuration
pub fn fit_expression<R: Rng>(
    config: &EvolutionConfig,
    dataset: &RegressionDataset,
    rng: &mut R,
) -> Result<FittedExpression, EvolutionError> {
    config.validate()?;
    let GenomeVariant::Tree(tree) = &config.variant else {
        return Err(EvolutionError::Configuration(
            "symbolic regression needs the tree genome variant".to_string(),
        ));
    };

    let primitives = Arc::new(traffic_primitives(tree)?);
    let fitness =
        SymbolicRegressionFitness::new(primitives.clone(), dataset.train(), tree.complexity_penalty)?;

    info!(
        "fitting expression to {} training pairs",
        dataset.train().len()
    );

    let result = SimpleGABuilder::new()
        .config(config.ga_config())
        .initializer(HalfAndHalfInit::new(
            primitives.clone(),
            tree.init_min_depth,
            tree.init_max_depth,
        )?)
        .selection(TournamentSelection::new(config.tournament_size))
        .crossover(OnePointSubtreeCrossover::new())
        .mutation(UniformSubtreeMutation::new(
            primitives.clone(),
            tree.mutation_min_depth,
            tree.mutation_max_depth,
        )?)
        .fitness(fitness)
        .build()?
        .run(rng)?;

    Ok(FittedExpression { primitives, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::FitnessValue;
    use crate::genome::tree::TreeNode;
    use approx::assert_relative_eq;

    fn mul_x_by(set: &PrimitiveSet, c: f64) -> TreeGenome {
        let mul = set.id_of("mul").unwrap();
        TreeGenome::new(TreeNode::function(
            mul,
            vec![TreeNode::variable(0), TreeNode::constant(c)],
        ))
    }

    #[test]
    fn test_z_score_uses_sample_std() {
        let z = z_score(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(z[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(z[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(z[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_z_score_constant_series_is_centred() {
        assert_eq!(z_score(&[5.0, 5.0, 5.0]), vec![0.0, 0.0, 0.0]);
        assert_eq!(z_score(&[4.0]), vec![0.0]);
    }

    #[test]
    fn test_split_is_seeded_and_disjoint() {
        let (train, val) = split_indices(10, 0.2, 42).unwrap();
        assert_eq!(val.len(), 2);
        assert_eq!(train.len(), 8);

        let mut all: Vec<usize> = train.iter().chain(&val).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());

        assert_eq!(split_indices(10, 0.2, 42).unwrap(), (train, val));
    }

    #[test]
    fn test_split_rounds_test_size_up() {
        let (train, val) = split_indices(11, 0.2, 1).unwrap();
        assert_eq!(val.len(), 3);
        assert_eq!(train.len(), 8);
        assert!(split_indices(1, 0.2, 1).is_err());
        assert!(split_indices(10, 1.0, 1).is_err());
    }

    #[test]
    fn test_prepare_rejects_mismatch() {
        let err = RegressionDataset::prepare(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::DatasetMismatch { left: 3, right: 2, .. }
        ));
        assert!(matches!(
            RegressionDataset::prepare(&[], &[]),
            Err(EvolutionError::EmptyDataset)
        ));
    }

    #[test]
    fn test_prepare_normalises_and_splits() {
        let inputs: Vec<f64> = (0..20).map(|i| i as f64 * 10.0).collect();
        let targets: Vec<f64> = inputs.iter().map(|x| 3.0 * x + 7.0).collect();
        let dataset = RegressionDataset::prepare(&inputs, &targets).unwrap();

        assert_eq!(dataset.train().len(), 16);
        assert_eq!(dataset.validation().len(), 4);
        // y is affine in x, so the normalised series coincide
        for &(x, y) in dataset.train().iter().chain(dataset.validation()) {
            assert_relative_eq!(x, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_primitives_rename_input() {
        let set = traffic_primitives(&TreeConfig::default()).unwrap();
        assert_eq!(set.variables(), &[INPUT_NAME.to_string()]);
        assert_eq!(set.primitives().len(), 6);
    }

    #[test]
    fn test_fitness_perfect_expression() {
        let set = Arc::new(traffic_primitives(&TreeConfig::default()).unwrap());
        let samples = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        let fitness = SymbolicRegressionFitness::new(set.clone(), &samples, 0.005).unwrap();

        let tree = mul_x_by(&set, 2.0);
        assert_relative_eq!(fitness.rmse(&tree), 0.0, epsilon = 1e-12);
        assert_relative_eq!(fitness.evaluate(&tree).0, 3.0 * 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_fitness_rmse_value() {
        let set = Arc::new(traffic_primitives(&TreeConfig::default()).unwrap());
        let samples = [(1.0, 2.0), (2.0, 4.0)];
        let fitness = SymbolicRegressionFitness::new(set.clone(), &samples, 0.0).unwrap();

        // predictions 1 and 2: errors 1 and 4
        let tree = TreeGenome::new(TreeNode::variable(0));
        assert_relative_eq!(fitness.evaluate(&tree).0, 2.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_fitness_non_finite_prediction_is_penalised() {
        let set = Arc::new(traffic_primitives(&TreeConfig::default()).unwrap());
        let samples = [(1e200, 0.0)];
        let fitness = SymbolicRegressionFitness::new(set.clone(), &samples, 0.0).unwrap();

        // (1e200)^2 overflows to infinity
        let mul = set.id_of("mul").unwrap();
        let square = TreeGenome::new(TreeNode::function(
            mul,
            vec![TreeNode::variable(0), TreeNode::variable(0)],
        ));
        let cost = fitness.evaluate(&square);
        assert!(cost.0.is_finite());
        assert_relative_eq!(cost.0, NON_FINITE_PENALTY.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_fitness_rejects_empty_samples() {
        let set = Arc::new(PrimitiveSet::arithmetic(1));
        assert!(matches!(
            SymbolicRegressionFitness::new(set, &[], 0.005),
            Err(EvolutionError::EmptyDataset)
        ));
    }

    #[test]
    fn test_validation_report() {
        let report = ValidationReport::from_predictions(&[1.1, 1.8, 0.5], &[1.0, 2.0, 0.0]).unwrap();
        assert_eq!(report.samples, 3);
        assert_relative_eq!(
            report.rmse,
            ((0.01 + 0.04 + 0.25) / 3.0f64).sqrt(),
            epsilon = 1e-12
        );
        // zero actual skipped: (10% + 10%) / 2
        assert_relative_eq!(report.mean_percentage_error.unwrap(), 10.0, epsilon = 1e-9);

        let zeros = ValidationReport::from_predictions(&[1.0], &[0.0]).unwrap();
        assert!(zeros.mean_percentage_error.is_none());
    }

    #[test]
    fn test_fit_expression_small_run() {
        let dataset =
            RegressionDataset::from_pairs(vec![(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
        let mut config = EvolutionConfig::symbolic_regression().with_seed(3);
        config.population_size = 60;
        config.generations = 10;

        let mut rng = config.rng();
        let fitted = fit_expression(&config, &dataset, &mut rng).unwrap();

        assert_eq!(fitted.result.statistics.len(), 11);
        assert!(fitted.best().validate(&fitted.primitives).is_ok());
        assert!(!fitted.expression().is_empty());
        for pair in fitted.result.best_history.windows(2) {
            assert!(!pair[1].is_worse_than(&pair[0]));
        }
    }

    #[test]
    fn test_fit_expression_rejects_vector_variant() {
        let dataset = RegressionDataset::from_pairs(vec![(1.0, 2.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            fit_expression(&EvolutionConfig::route_weights(), &dataset, &mut rng),
            Err(EvolutionError::Configuration(_))
        ));
    }
}
