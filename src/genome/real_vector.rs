//! Real-valued vector genome
//!
//! Fixed-length vector of real genes. The route-weight search uses four
//! genes (time, delay, distance, complexity weights) seeded in [0, 1].

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::traits::{EvolutionaryGenome, RealValuedGenome};

/// Fixed-length real-valued vector genome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealVector {
    /// The genes (values) of this genome
    genes: Vec<f64>,
}

impl RealVector {
    /// Create a new real vector with the given genes
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Create a vector filled with a constant value
    pub fn filled(dimension: usize, value: f64) -> Self {
        Self {
            genes: vec![value; dimension],
        }
    }

    /// Get the underlying vector
    pub fn into_inner(self) -> Vec<f64> {
        self.genes
    }

    /// Iterate over the genes
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.genes.iter()
    }
}

impl EvolutionaryGenome for RealVector {
    type Allele = f64;

    fn dimension(&self) -> usize {
        self.genes.len()
    }
}

impl RealValuedGenome for RealVector {
    fn genes(&self) -> &[f64] {
        &self.genes
    }

    fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.genes
    }

    fn from_genes(genes: Vec<f64>) -> Result<Self, GenomeError> {
        if genes.is_empty() {
            return Err(GenomeError::InvalidStructure(
                "vector genome needs at least one gene".to_string(),
            ));
        }
        Ok(Self { genes })
    }
}

impl std::ops::Index<usize> for RealVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.genes[index]
    }
}

impl std::ops::IndexMut<usize> for RealVector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.genes[index]
    }
}

impl From<Vec<f64>> for RealVector {
    fn from(genes: Vec<f64>) -> Self {
        Self { genes }
    }
}

impl<const N: usize> From<[f64; N]> for RealVector {
    fn from(arr: [f64; N]) -> Self {
        Self {
            genes: arr.to_vec(),
        }
    }
}

impl<'a> IntoIterator for &'a RealVector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}
