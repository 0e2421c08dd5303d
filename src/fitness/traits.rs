//! Fitness traits
//!
//! A fitness value knows its own optimisation direction: plain `f64` is
//! maximised, [`Cost`] is minimised. Every comparison in selection, the
//! hall of fame and the driver goes through [`FitnessValue::is_better_than`].

use std::fmt::{self, Debug};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::genome::traits::EvolutionaryGenome;

/// Trait bound for fitness values
pub trait FitnessValue:
    PartialOrd + Clone + Send + Sync + Debug + Serialize + DeserializeOwned + 'static
{
    /// Raw numeric value, used for statistics and logging
    fn to_f64(&self) -> f64;

    /// Check if this fitness is strictly better than another
    fn is_better_than(&self, other: &Self) -> bool;

    /// Check if this fitness is strictly worse than another
    fn is_worse_than(&self, other: &Self) -> bool {
        other.is_better_than(self)
    }

    /// Whether the raw value is a usable number
    fn is_finite(&self) -> bool {
        self.to_f64().is_finite()
    }
}

impl FitnessValue for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }

    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }
}

/// A fitness value to be minimised, such as an error measure
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cost(pub f64);

impl FitnessValue for Cost {
    fn to_f64(&self) -> f64 {
        self.0
    }

    fn is_better_than(&self, other: &Self) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<f64> for Cost {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Fitness evaluation trait
///
/// Evaluation must be a pure function of the genome so that individuals can
/// be scored in any order, including in parallel.
#[cfg(feature = "parallel")]
pub trait Fitness: Send + Sync {
    /// The genome type being evaluated
    type Genome: EvolutionaryGenome;

    /// The fitness value type
    type Value: FitnessValue;

    /// Evaluate fitness
    fn evaluate(&self, genome: &Self::Genome) -> Self::Value;
}

/// Fitness evaluation trait (non-parallel version)
#[cfg(not(feature = "parallel"))]
pub trait Fitness {
    /// The genome type being evaluated
    type Genome: EvolutionaryGenome;

    /// The fitness value type
    type Value: FitnessValue;

    /// Evaluate fitness
    fn evaluate(&self, genome: &Self::Genome) -> Self::Value;
}

/// A simple function wrapper for fitness evaluation
pub struct FnFitness<G, F, V>
where
    F: Fn(&G) -> V,
{
    f: F,
    _marker: std::marker::PhantomData<fn() -> (G, V)>,
}

impl<G, F, V> FnFitness<G, F, V>
where
    F: Fn(&G) -> V,
{
    /// Create a new function-based fitness evaluator
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<G, F, V> Fitness for FnFitness<G, F, V>
where
    G: EvolutionaryGenome,
    F: Fn(&G) -> V + Send + Sync,
    V: FitnessValue,
{
    type Genome = G;
    type Value = V;

    fn evaluate(&self, genome: &Self::Genome) -> Self::Value {
        (self.f)(genome)
    }
}
