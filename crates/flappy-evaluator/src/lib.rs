//! Controllers for the flappy evaluation harness.
//!
//! The harness in `flappy-engine` only knows the [`Controller`](flappy_engine::Controller)
//! contract: three sensor readings in, at least one output out, jump when the
//! first output is positive. This crate provides the controllers that plug into
//! it and the loop that drives a batch to its end.
//!
//! - [`network`] - Fixed-topology feed-forward network built from a flat weight vector
//! - [`heuristic`] - Hand-written gap follower, useful as a baseline
//! - [`batch_evaluator`] - Runs a batch until extinction, a tick limit, or a stop signal
//!
//! # Sensor Layout
//!
//! ```text
//! inputs[0] = bird y
//! inputs[1] = |bird y - gap top edge|
//! inputs[2] = |bird y - gap bottom edge|
//! ```
//!
//! The values are raw screen units; networks learn their own scaling.
//!
//! # Example
//!
//! ```
//! use flappy_engine::{WorldConfig, WorldSeed};
//! use flappy_evaluator::{batch_evaluator::BatchEvaluator, heuristic::GapFollower};
//!
//! let evaluator = BatchEvaluator::new(Some(500));
//! let report = evaluator.evaluate(
//!     WorldConfig::default(),
//!     WorldSeed::from_u128(1),
//!     [GapFollower::default()],
//! )?;
//! assert!(report.ticks() <= 500);
//! # Ok::<(), flappy_engine::BatchError>(())
//! ```

pub mod batch_evaluator;
pub mod heuristic;
pub mod network;
