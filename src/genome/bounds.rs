//! Bounds for genome values
//!
//! Bounds are used to seed vector genomes. They are soft: variation
//! operators may push genes outside them and evaluation never clamps.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;

/// Bounds for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Create bounds from untrusted input, rejecting inverted or non-finite ranges
    pub fn try_new(min: f64, max: f64) -> Result<Self, EvolutionError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(EvolutionError::Configuration(format!(
                "invalid bounds [{}, {}]",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Create unit bounds [0, 1]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Draw a value uniformly from the bounds
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.range() == 0.0 {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Multi-dimensional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create new multi-dimensional bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Create uniform bounds for all dimensions
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Get number of dimensions
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Get bounds for a specific dimension
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values
                .iter()
                .zip(self.bounds.iter())
                .all(|(&v, b)| b.contains(v))
    }

    /// Draw one value per dimension
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.bounds.iter().map(|b| b.sample(rng)).collect()
    }
}

impl FromIterator<(f64, f64)> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().map(Bounds::from).collect(),
        }
    }
}
