//! Evolutionary algorithms
//!
//! The generational driver shared by every problem in this crate.

pub mod simple_ga;

pub mod prelude {
    pub use super::simple_ga::*;
}
