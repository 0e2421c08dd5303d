//! Problem instantiations of the generational driver
//!
//! Route-weight optimisation over real vectors and symbolic regression over
//! expression trees.

pub mod route_weights;
pub mod symbolic_regression;

pub mod prelude {
    pub use super::route_weights::*;
    pub use super::symbolic_regression::*;
}
