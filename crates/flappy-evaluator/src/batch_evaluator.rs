//! Driving a batch to its end.
//!
//! A batch ends on its own once every bird is gone, but a good controller can
//! fly forever. [`BatchEvaluator`] adds the two other ways out:
//!
//! - a tick limit, for training where every generation needs a bounded cost
//! - a stop signal returned by the per-tick callback, for interactive views
//!
//! The callback runs after each completed tick, so a batch is never stopped
//! halfway through one.

use std::ops::ControlFlow;

use flappy_engine::{Batch, BatchError, BatchReport, Controller, TickReport, WorldConfig, WorldSeed};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchEvaluator {
    tick_limit: Option<u64>,
}

impl BatchEvaluator {
    /// Creates an evaluator; `None` runs each batch until extinction.
    #[must_use]
    pub const fn new(tick_limit: Option<u64>) -> Self {
        Self { tick_limit }
    }

    #[must_use]
    pub fn tick_limit(&self) -> Option<u64> {
        self.tick_limit
    }

    /// Starts a batch for `controllers` and runs it to the end.
    pub fn evaluate<C, I>(
        &self,
        config: WorldConfig,
        seed: WorldSeed,
        controllers: I,
    ) -> Result<BatchReport, BatchError>
    where
        C: Controller,
        I: IntoIterator<Item = C>,
    {
        let batch = Batch::new(config, seed, controllers)?;
        Ok(self.run(batch, |_, _| ControlFlow::Continue(())))
    }

    /// Ticks `batch` until it finishes, the tick limit is reached, or `on_tick`
    /// breaks, then reports its fitness.
    pub fn run<C, F>(&self, mut batch: Batch<C>, mut on_tick: F) -> BatchReport
    where
        C: Controller,
        F: FnMut(&Batch<C>, &TickReport) -> ControlFlow<()>,
    {
        while batch.state().is_running() {
            if self.tick_limit.is_some_and(|limit| batch.ticks() >= limit) {
                tracing::debug!(
                    ticks = batch.ticks(),
                    alive = batch.alive(),
                    "tick limit reached"
                );
                break;
            }
            let report = batch.tick();
            if on_tick(&batch, &report).is_break() {
                tracing::debug!(ticks = batch.ticks(), "batch stopped");
                break;
            }
        }
        batch.finish()
    }
}

#[cfg(test)]
mod tests {
    use flappy_engine::FnController;

    use super::*;
    use crate::heuristic::GapFollower;

    #[test]
    fn test_runs_until_extinction() {
        let evaluator = BatchEvaluator::default();
        let falling = FnController::new(|_: &[f32]| -1.0);
        let report = evaluator
            .evaluate(WorldConfig::default(), WorldSeed::from_u128(3), [falling])
            .unwrap();
        assert_eq!(report.ticks(), 23);
        assert!(report.entrants()[0].death_cause.is_some());
    }

    #[test]
    fn test_tick_limit_stops_survivors() {
        let evaluator = BatchEvaluator::new(Some(300));
        let report = evaluator
            .evaluate(
                WorldConfig::default(),
                WorldSeed::from_u128(3),
                [GapFollower::default(), GapFollower::default()],
            )
            .unwrap();
        assert_eq!(report.ticks(), 300);
        for outcome in report.entrants() {
            assert_eq!(outcome.death_cause, None);
        }
    }

    #[test]
    fn test_break_stops_after_the_tick() {
        let evaluator = BatchEvaluator::default();
        let batch = Batch::new(
            WorldConfig::default(),
            WorldSeed::from_u128(3),
            [GapFollower::default()],
        )
        .unwrap();
        let mut seen = 0;
        let report = evaluator.run(batch, |batch, tick| {
            seen += 1;
            assert_eq!(tick.alive(), batch.alive());
            if batch.ticks() == 10 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, 10);
        assert_eq!(report.ticks(), 10);
    }

    #[test]
    fn test_rejects_invalid_batch() {
        let evaluator = BatchEvaluator::default();
        let err = evaluator
            .evaluate(
                WorldConfig::default(),
                WorldSeed::from_u128(3),
                Vec::<GapFollower>::new(),
            )
            .unwrap_err();
        assert!(err.is_no_entrants());
    }
}
