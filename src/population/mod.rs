//! Population management
//!
//! This module provides the Individual, Population and HallOfFame types and
//! the initializers that seed the first generation.

pub mod hall_of_fame;
pub mod individual;
pub mod initializer;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::hall_of_fame::*;
    pub use super::individual::*;
    pub use super::initializer::*;
    pub use super::population::*;
}
