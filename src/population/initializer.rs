//! Genome initializers
//!
//! Strategies that produce the first generation's genomes.

use std::sync::Arc;

use rand::Rng;

use crate::error::EvolutionError;
use crate::genome::bounds::MultiBounds;
use crate::genome::primitives::PrimitiveSet;
use crate::genome::real_vector::RealVector;
use crate::genome::traits::EvolutionaryGenome;
use crate::genome::tree::TreeGenome;

/// Produces fresh random genomes
pub trait Initializer<G: EvolutionaryGenome>: Send + Sync {
    /// Create one random genome
    fn initialize<R: Rng>(&self, rng: &mut R) -> G;
}

/// Draws each gene uniformly from its bounds
#[derive(Clone, Debug)]
pub struct UniformInit {
    bounds: MultiBounds,
}

impl UniformInit {
    /// Create from per-gene bounds
    pub fn new(bounds: MultiBounds) -> Self {
        Self { bounds }
    }

    /// The bounds genes are drawn from
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }
}

impl Initializer<RealVector> for UniformInit {
    fn initialize<R: Rng>(&self, rng: &mut R) -> RealVector {
        RealVector::new(self.bounds.sample(rng))
    }
}

/// Builds trees with the full or grow method, chosen with equal odds per tree
#[derive(Clone, Debug)]
pub struct HalfAndHalfInit {
    primitives: Arc<PrimitiveSet>,
    min_depth: usize,
    max_depth: usize,
}

impl HalfAndHalfInit {
    /// Create an initializer over `[min_depth, max_depth]`
    pub fn new(
        primitives: Arc<PrimitiveSet>,
        min_depth: usize,
        max_depth: usize,
    ) -> Result<Self, EvolutionError> {
        if min_depth > max_depth {
            return Err(EvolutionError::Configuration(format!(
                "initial depth range [{}, {}] is inverted",
                min_depth, max_depth
            )));
        }
        primitives.validate()?;
        Ok(Self {
            primitives,
            min_depth,
            max_depth,
        })
    }

    /// The registry trees are built from
    pub fn primitives(&self) -> &Arc<PrimitiveSet> {
        &self.primitives
    }
}

impl Initializer<TreeGenome> for HalfAndHalfInit {
    fn initialize<R: Rng>(&self, rng: &mut R) -> TreeGenome {
        TreeGenome::generate_half_and_half(rng, &self.primitives, self.min_depth, self.max_depth)
    }
}
