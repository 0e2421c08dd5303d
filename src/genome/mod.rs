//! Genome abstractions and implementations
//!
//! This module provides the core `EvolutionaryGenome` trait, the real-vector
//! genome, and expression trees with their primitive registry.

pub mod bounds;
pub mod primitives;
pub mod real_vector;
pub mod traits;
pub mod tree;

pub mod prelude {
    pub use super::bounds::*;
    pub use super::primitives::{safe_div, safe_log, Primitive, PrimitiveId, PrimitiveSet, Terminal};
    pub use super::real_vector::*;
    pub use super::traits::*;
    pub use super::tree::*;
}
