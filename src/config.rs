//! Run configuration
//!
//! A serialisable description of one evolutionary run: population and
//! generation budget, variation rates, tournament size and the genome
//! variant with its own parameters. Configurations are plain TOML on disk.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::algorithms::simple_ga::SimpleGAConfig;
use crate::error::EvolutionError;

/// Parameters of the fixed-length real vector variant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    /// Number of genes
    pub dimension: usize,
    /// Lower bound for initial genes
    pub init_min: f64,
    /// Upper bound for initial genes
    pub init_max: f64,
    /// Blend crossover extension factor
    pub blend_alpha: f64,
    /// Standard deviation of Gaussian mutation
    pub mutation_sigma: f64,
    /// Per-gene mutation probability
    pub mutation_indpb: f64,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            dimension: 4,
            init_min: 0.0,
            init_max: 1.0,
            blend_alpha: 0.5,
            mutation_sigma: 0.1,
            mutation_indpb: 0.2,
        }
    }
}

/// Parameters of the expression tree variant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Minimum depth of initial trees
    pub init_min_depth: usize,
    /// Maximum depth of initial trees
    pub init_max_depth: usize,
    /// Minimum depth of subtrees grown by mutation
    pub mutation_min_depth: usize,
    /// Maximum depth of subtrees grown by mutation
    pub mutation_max_depth: usize,
    /// Fitness penalty per tree node
    pub complexity_penalty: f64,
    /// Lower bound of ephemeral constants
    pub erc_min: f64,
    /// Upper bound of ephemeral constants
    pub erc_max: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            init_min_depth: 1,
            init_max_depth: 3,
            mutation_min_depth: 2,
            mutation_max_depth: 4,
            complexity_penalty: 0.005,
            erc_min: -0.5,
            erc_max: 0.5,
        }
    }
}

/// Which genome representation a run evolves
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenomeVariant {
    /// Fixed-length real vector
    Vector(VectorConfig),
    /// Expression tree
    Tree(TreeConfig),
}

/// Configuration of one evolutionary run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_probability: f64,
    pub mutation_probability: f64,
    pub tournament_size: usize,
    /// Seed for the run's random generator; `None` draws one from entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub variant: GenomeVariant,
}

impl EvolutionConfig {
    /// Route-weight search: 50 individuals, 40 generations
    pub fn route_weights() -> Self {
        Self {
            population_size: 50,
            generations: 40,
            crossover_probability: 0.5,
            mutation_probability: 0.2,
            tournament_size: 3,
            seed: None,
            variant: GenomeVariant::Vector(VectorConfig::default()),
        }
    }

    /// Symbolic regression: 500 individuals, 150 generations
    pub fn symbolic_regression() -> Self {
        Self {
            population_size: 500,
            generations: 150,
            crossover_probability: 0.7,
            mutation_probability: 0.2,
            tournament_size: 3,
            seed: None,
            variant: GenomeVariant::Tree(TreeConfig::default()),
        }
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The run's random generator, seeded from `seed` when present
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Check every setting before a run starts
    pub fn validate(&self) -> Result<(), EvolutionError> {
        self.ga_config().validate()?;
        if self.tournament_size == 0 {
            return Err(EvolutionError::Configuration(
                "tournament size must be at least 1".to_string(),
            ));
        }
        match &self.variant {
            GenomeVariant::Vector(v) => {
                if v.dimension == 0 {
                    return Err(EvolutionError::Configuration(
                        "vector dimension must be at least 1".to_string(),
                    ));
                }
                if !(v.init_min.is_finite() && v.init_max.is_finite()) || v.init_min > v.init_max {
                    return Err(EvolutionError::Configuration(format!(
                        "initial gene range [{}, {}] is invalid",
                        v.init_min, v.init_max
                    )));
                }
                if !(v.blend_alpha >= 0.0) {
                    return Err(EvolutionError::Configuration(format!(
                        "blend alpha {} must be non-negative",
                        v.blend_alpha
                    )));
                }
                if !(v.mutation_sigma > 0.0 && v.mutation_sigma.is_finite()) {
                    return Err(EvolutionError::Configuration(format!(
                        "mutation sigma {} must be positive",
                        v.mutation_sigma
                    )));
                }
                if !(0.0..=1.0).contains(&v.mutation_indpb) {
                    return Err(EvolutionError::Configuration(format!(
                        "per-gene mutation probability {} outside [0, 1]",
                        v.mutation_indpb
                    )));
                }
            }
            GenomeVariant::Tree(t) => {
                if t.init_min_depth > t.init_max_depth {
                    return Err(EvolutionError::Configuration(format!(
                        "initial depth range [{}, {}] is inverted",
                        t.init_min_depth, t.init_max_depth
                    )));
                }
                if t.mutation_min_depth > t.mutation_max_depth {
                    return Err(EvolutionError::Configuration(format!(
                        "mutation depth range [{}, {}] is inverted",
                        t.mutation_min_depth, t.mutation_max_depth
                    )));
                }
                if !(t.complexity_penalty >= 0.0 && t.complexity_penalty.is_finite()) {
                    return Err(EvolutionError::Configuration(format!(
                        "complexity penalty {} must be non-negative",
                        t.complexity_penalty
                    )));
                }
                if !(t.erc_min.is_finite() && t.erc_max.is_finite()) || t.erc_min > t.erc_max {
                    return Err(EvolutionError::Configuration(format!(
                        "ephemeral constant range [{}, {}] is invalid",
                        t.erc_min, t.erc_max
                    )));
                }
            }
        }
        Ok(())
    }

    /// Driver settings derived from this configuration
    pub fn ga_config(&self) -> SimpleGAConfig {
        SimpleGAConfig {
            population_size: self.population_size,
            generations: self.generations,
            crossover_probability: self.crossover_probability,
            mutation_probability: self.mutation_probability,
            ..SimpleGAConfig::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, EvolutionError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| EvolutionError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, EvolutionError> {
        toml::to_string_pretty(self)
            .map_err(|e| EvolutionError::Configuration(format!("Failed to serialize: {}", e)))
    }

    /// Load and validate a configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EvolutionError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvolutionError::Configuration(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&contents)
    }

    /// Write this configuration as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvolutionError> {
        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str)
            .map_err(|e| EvolutionError::Configuration(format!("Failed to write config: {}", e)))?;
        Ok(())
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self::route_weights()
    }
}
