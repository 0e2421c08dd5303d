//! Error types for ci-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for genome operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Invalid genome structure
    #[error("Invalid genome structure: {0}")]
    InvalidStructure(String),

    /// A tree node carries the wrong number of children for its primitive
    #[error("Arity mismatch for primitive '{primitive}': expected {expected}, got {actual}")]
    ArityMismatch {
        primitive: String,
        expected: usize,
        actual: usize,
    },

    /// A tree node references a primitive the registry does not know
    #[error("Unknown primitive id {0}")]
    UnknownPrimitive(usize),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Mutation operation failed
    #[error("Mutation failed: {0}")]
    MutationFailed(String),

    /// Invalid operator configuration
    #[error("Invalid operator configuration: {0}")]
    InvalidConfiguration(String),
}

/// Error type for run-record persistence
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// IO error while reading or writing a record
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Record version mismatch
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Record file not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Corrupted record data
    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Invalid configuration, raised before the generational loop starts
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The dataset handed to the engine has no rows
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Two series that must be paired have different lengths
    #[error("Dataset mismatch in {what}: {left} vs {right} rows")]
    DatasetMismatch {
        what: String,
        left: usize,
        right: usize,
    },

    /// The dataset contains rows the evaluator cannot score
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Fitness evaluation produced an unusable value
    #[error("Fitness evaluation failed at generation {generation}, individual {index}: {message}")]
    FitnessEvaluation {
        generation: usize,
        index: usize,
        message: String,
    },

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// Persistence error
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;

/// Result of an operator application
#[derive(Debug, Clone)]
pub enum OperatorResult<G> {
    /// Operation succeeded
    Success(G),
    /// Operation failed unrecoverably
    Failed(OperatorError),
}

impl<G> OperatorResult<G> {
    /// Returns the genome if successful, None if failed
    pub fn genome(self) -> Option<G> {
        match self {
            Self::Success(g) => Some(g),
            Self::Failed(_) => None,
        }
    }

    /// Returns true if the operation was successful
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts into a standard `Result`
    pub fn into_result(self) -> Result<G, OperatorError> {
        match self {
            Self::Success(g) => Ok(g),
            Self::Failed(e) => Err(e),
        }
    }
}
