//! Core genome traits
//!
//! This module defines the `EvolutionaryGenome` trait shared by the vector
//! and expression-tree genomes.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::GenomeError;

/// Core genome abstraction for evolutionary algorithms.
///
/// Genomes must be cloneable, serializable, and thread-safe. A clone must be
/// fully independent of its source: the population relies on this so that
/// varying one individual never disturbs another.
pub trait EvolutionaryGenome: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The allele type for individual genes
    type Allele: Clone + Send;

    /// Observable size of the genome (gene count or node count)
    fn dimension(&self) -> usize;

}

/// Trait for genomes that can be represented as real vectors
pub trait RealValuedGenome: EvolutionaryGenome<Allele = f64> {
    /// Get the genes as a slice of f64 values
    fn genes(&self) -> &[f64];

    /// Get the genes as a mutable slice of f64 values
    fn genes_mut(&mut self) -> &mut [f64];

    /// Create from a vector of genes
    fn from_genes(genes: Vec<f64>) -> Result<Self, GenomeError>;
}
