//! Fitness evaluation
//!
//! This module provides the fitness abstraction and fitness value types.

pub mod traits;

pub mod prelude {
    pub use super::traits::*;
}
