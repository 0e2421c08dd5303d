//! Persistence of run outputs
//!
//! Run records (best genome, fitness and statistics) saved as JSON or
//! versioned binary, and an append-only CSV log of fitness per generation.

mod recovery;
mod run_log;
mod state;

pub use recovery::*;
pub use run_log::*;
pub use state::*;

/// Prelude for checkpoint module
pub mod prelude {
    pub use super::recovery::*;
    pub use super::run_log::*;
    pub use super::state::*;
}
