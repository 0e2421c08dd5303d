//! # ci-evo
//!
//! Evolutionary search for routing intelligence.
//!
//! One generational engine (tournament selection, pairwise crossover,
//! per-individual mutation, full replacement and a hall of fame) drives two
//! problems:
//!
//! - **Route weights**: a four-gene real vector that blends travel time,
//!   traffic delay, distance and a flat complexity term into a route score,
//!   maximised over a set of candidate routes.
//! - **Symbolic regression**: an expression tree over guarded arithmetic
//!   that predicts one traffic count from another, minimising RMSE plus a
//!   size penalty.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ci_evo::prelude::*;
//!
//! # fn main() -> Result<(), EvolutionError> {
//! let config = EvolutionConfig::route_weights().with_seed(42);
//! let routes = RouteDataset::new(vec![
//!     RouteMetrics::new(32.0, 4.0, 28.5, RouteKind::Fastest),
//!     RouteMetrics::new(41.0, 2.0, 26.0, RouteKind::Eco),
//! ])?;
//!
//! let result = optimize_route_weights(&config, routes, NoAdjustment, &mut config.rng())?;
//! println!("best weights {:?} scoring {}", result.best_genome.genes(), result.best_fitness);
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod checkpoint;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;
pub mod problems;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::checkpoint::prelude::*;
    pub use crate::config::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::problems::prelude::*;
}
