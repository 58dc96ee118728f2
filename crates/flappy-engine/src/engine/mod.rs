//! Evaluation harness and its parameters.
//!
//! - [`WorldConfig`] - Immutable parameter bundle (screen, physics, pipes, rewards)
//! - [`WorldSeed`] - Seed for deterministic pipe generation
//! - [`Controller`] - Decision-maker contract consumed by the harness
//! - [`Batch`] - One generation of birds flying until all of them are gone
//! - [`BatchStats`] - Counters collected while a batch runs
//!
//! # Tick Flow
//!
//! Each [`Batch::tick`] runs these steps in order, and is never observable half-done:
//!
//! 1. Pick the pipe every bird senses this tick (shared by all birds)
//! 2. Step each bird, grant the survival bonus, ask its controller, apply the action
//! 3. Step each pipe, test collisions, detect the pass event
//! 4. On a pass event: reward all live birds, spawn one pipe, increase the score
//! 5. Mark birds that left the screen vertically
//! 6. Remove every marked bird together with its controller and fitness
//! 7. Drop pipes that scrolled off the left edge
//! 8. Step the floor
//!
//! # Example
//!
//! ```
//! use flappy_engine::{Batch, FnController, WorldConfig, WorldSeed};
//!
//! let never_jump = FnController::new(|_inputs: &[f32]| -1.0);
//! let mut batch = Batch::new(WorldConfig::default(), WorldSeed::from_u128(42), [never_jump])?;
//!
//! while batch.state().is_running() {
//!     batch.tick();
//! }
//!
//! let report = batch.finish();
//! assert_eq!(report.entrants().len(), 1);
//! # Ok::<(), flappy_engine::BatchError>(())
//! ```

pub use self::{batch::*, batch_stats::*, config::*, controller::*, seed::*};

mod batch;
mod batch_stats;
mod config;
mod controller;
mod seed;
