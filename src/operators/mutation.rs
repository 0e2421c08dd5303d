//! Mutation operators
//!
//! Gaussian perturbation for real vectors and uniform subtree replacement
//! for expression trees.

use std::sync::Arc;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::OperatorError;
use crate::genome::primitives::PrimitiveSet;
use crate::genome::real_vector::RealVector;
use crate::genome::traits::RealValuedGenome;
use crate::genome::tree::TreeGenome;
use crate::operators::traits::MutationOperator;

/// Gaussian mutation
///
/// Adds `N(0, sigma)` noise to each gene independently with probability
/// `indpb`. Genes are not clamped afterwards.
#[derive(Clone, Debug)]
pub struct GaussianMutation {
    /// Standard deviation of the Gaussian noise
    pub sigma: f64,
    /// Per-gene mutation probability
    pub indpb: f64,
    normal: Normal<f64>,
}

impl GaussianMutation {
    /// Create a Gaussian mutation
    pub fn new(sigma: f64, indpb: f64) -> Result<Self, OperatorError> {
        if !(0.0..=1.0).contains(&indpb) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "per-gene probability {} outside [0, 1]",
                indpb
            )));
        }
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "sigma {} must be positive and finite",
                sigma
            )));
        }
        let normal = Normal::new(0.0, sigma).map_err(|e| {
            OperatorError::InvalidConfiguration(format!("sigma {}: {}", sigma, e))
        })?;
        Ok(Self {
            sigma,
            indpb,
            normal,
        })
    }
}

impl MutationOperator<RealVector> for GaussianMutation {
    fn mutate<R: Rng>(&self, genome: &mut RealVector, rng: &mut R) {
        for gene in genome.genes_mut() {
            if rng.gen::<f64>() < self.indpb {
                *gene += self.normal.sample(rng);
            }
        }
    }
}

/// Uniform subtree mutation
///
/// Picks a node uniformly (root included) and replaces the subtree rooted
/// there with a freshly built full tree whose depth lies in
/// `[min_depth, max_depth]`.
#[derive(Clone, Debug)]
pub struct UniformSubtreeMutation {
    primitives: Arc<PrimitiveSet>,
    min_depth: usize,
    max_depth: usize,
}

impl UniformSubtreeMutation {
    /// Create a subtree mutation drawing from `primitives`
    pub fn new(
        primitives: Arc<PrimitiveSet>,
        min_depth: usize,
        max_depth: usize,
    ) -> Result<Self, OperatorError> {
        if min_depth > max_depth {
            return Err(OperatorError::InvalidConfiguration(format!(
                "subtree depth range [{}, {}] is inverted",
                min_depth, max_depth
            )));
        }
        if primitives.primitives().is_empty() {
            return Err(OperatorError::InvalidConfiguration(
                "primitive set has no operators".to_string(),
            ));
        }
        Ok(Self {
            primitives,
            min_depth,
            max_depth,
        })
    }
}

impl MutationOperator<TreeGenome> for UniformSubtreeMutation {
    fn mutate<R: Rng>(&self, genome: &mut TreeGenome, rng: &mut R) {
        let position = genome.random_position(rng);
        let subtree =
            TreeGenome::generate_full(rng, &self.primitives, self.min_depth, self.max_depth);
        genome.root.replace_subtree(&position, subtree.root);
    }
}
