//! Training feed-forward controllers with a genetic algorithm.
//!
//! The harness only asks for controllers and hands back one fitness value per
//! controller. This crate sits on the other side of that boundary: it owns a
//! population of network weight vectors, turns them into controllers for each
//! generation, and breeds the next generation from the fitness they earn.
//!
//! # How Training Works
//!
//! 1. **Population** - Random weights for a fixed topology such as `[3, 4, 1]`
//! 2. **Evaluation** - The whole generation flies one shared batch per seed
//! 3. **Selection** - Elites survive, parents win small tournaments
//! 4. **Reproduction** - BLX-α crossover followed by Gaussian mutation
//! 5. **Repeat** - Until the generation budget or a fitness threshold is reached
//!
//! # Architecture
//!
//! ```text
//! PopulationEvolver
//!     ↓ breeds
//! Population (weight vectors)
//!     ↓ builds
//! FeedForwardNetwork controllers (flappy-evaluator)
//!     ↓ fly in
//! Batch (flappy-engine)
//!     ↓ reports
//! Fitness per controller
//! ```
//!
//! See [`genetic`] for the algorithm, [`weights`] for the vector operators and
//! [`statistics`] for per-generation summaries.
//!
//! # Current Limitations
//!
//! - **Fixed topology**: only weights evolve; layer sizes are chosen up front
//! - **No speciation**: the population is one pool, so diversity relies on
//!   tournament selection and mutation alone
//! - **Coupled fitness**: birds in a batch share the pass bonus, so fitness is
//!   partly a property of the whole generation

use flappy_engine::BatchError;
use flappy_evaluator::network::NetworkError;

pub mod genetic;
pub mod statistics;
pub mod weights;

/// Error returned when a generation cannot be evaluated.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("invalid network: {_0}")]
    Network(NetworkError),
    #[display("cannot run batch: {_0}")]
    Batch(BatchError),
}
