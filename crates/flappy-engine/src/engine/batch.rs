use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    Action, BatchError, BatchStats, Bird, Controller, DeathCause, Floor, Pipe, SENSOR_COUNT,
    SpriteMasks, WorldConfig, WorldSeed,
};

/// Identity of a controller within one batch: its position in the list passed
/// to [`Batch::new`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display,
)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct EntrantId(usize);

impl EntrantId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BatchState {
    /// At least one bird is alive.
    Running,
    /// Every bird has been removed.
    Finished,
}

/// A live bird together with the controller and fitness that belong to it.
///
/// Keeping the three in one record means removing a bird cannot leave the
/// controller or fitness of another bird at its index.
#[derive(Debug)]
struct Entrant<C> {
    id: EntrantId,
    bird: Bird,
    controller: C,
    fitness: f32,
    removal: Option<DeathCause>,
}

#[derive(Debug, Clone, Copy)]
struct Retirement {
    fitness: f32,
    cause: DeathCause,
}

/// Read-only view of a live entrant.
#[derive(Debug, Clone, Copy)]
pub struct EntrantView<'a> {
    pub id: EntrantId,
    pub bird: &'a Bird,
    pub fitness: f32,
}

/// What happened during one [`Batch::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    passed: bool,
    removed: Vec<(EntrantId, DeathCause)>,
    alive: usize,
}

impl TickReport {
    /// Returns whether a pipe was passed (and a new one spawned) this tick.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Entrants removed this tick, in their pre-tick order.
    #[must_use]
    pub fn removed(&self) -> &[(EntrantId, DeathCause)] {
        &self.removed
    }

    /// Number of entrants still alive after the tick.
    #[must_use]
    pub fn alive(&self) -> usize {
        self.alive
    }
}

/// Final result of one controller in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrantOutcome {
    pub id: EntrantId,
    pub fitness: f32,
    /// `None` when the batch was stopped while the bird was alive.
    pub death_cause: Option<DeathCause>,
}

/// Fitness of every controller that took part in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    entrants: Vec<EntrantOutcome>,
    stats: BatchStats,
}

impl BatchReport {
    /// Outcomes ordered by [`EntrantId`].
    #[must_use]
    pub fn entrants(&self) -> &[EntrantOutcome] {
        &self.entrants
    }

    #[must_use]
    pub fn fitness(&self, id: EntrantId) -> Option<f32> {
        self.entrants.get(id.index()).map(|outcome| outcome.fitness)
    }

    #[must_use]
    pub fn best(&self) -> Option<&EntrantOutcome> {
        self.entrants
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.stats.ticks()
    }

    #[must_use]
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }
}

/// One generation of birds flying the same course until all of them are gone.
///
/// Every bird spawns at the same point and senses the same pipes, so a batch is
/// a shared environment: the pass bonus and the score are global to the batch.
/// There is always at least one pipe.
#[derive(Debug)]
pub struct Batch<C> {
    config: WorldConfig,
    masks: SpriteMasks,
    rng: Pcg32,
    entrants: Vec<Entrant<C>>,
    retired: Vec<Option<Retirement>>,
    pipes: Vec<Pipe>,
    floor: Floor,
    stats: BatchStats,
    outputs: Vec<f32>,
}

impl<C> Batch<C>
where
    C: Controller,
{
    /// Starts a batch with one bird per controller.
    ///
    /// Fails if the configuration is invalid, if no controller is given, or if a
    /// controller does not take [`SENSOR_COUNT`] inputs and produce at least one
    /// output.
    pub fn new<I>(config: WorldConfig, seed: WorldSeed, controllers: I) -> Result<Self, BatchError>
    where
        I: IntoIterator<Item = C>,
    {
        config.validate()?;

        let mut entrants = vec![];
        let mut max_outputs = 1;
        for (index, controller) in controllers.into_iter().enumerate() {
            let id = EntrantId(index);
            let input_len = controller.input_len();
            let output_len = controller.output_len();
            if input_len != SENSOR_COUNT || output_len == 0 {
                return Err(BatchError::ControllerShape {
                    id,
                    input_len,
                    output_len,
                    expected_inputs: SENSOR_COUNT,
                });
            }
            max_outputs = max_outputs.max(output_len);
            entrants.push(Entrant {
                id,
                bird: Bird::new(config.bird.spawn_x, config.bird.spawn_y),
                controller,
                fitness: 0.0,
                removal: None,
            });
        }
        if entrants.is_empty() {
            return Err(BatchError::NoEntrants);
        }

        let masks = SpriteMasks::new(
            (config.bird.width, config.bird.height),
            (config.pipe.width, config.pipe.height),
        );
        let mut rng = seed.rng();
        let pipes = vec![Pipe::new(config.pipe.spawn_x, &config.pipe, &mut rng)];
        let floor = Floor::new(config.floor.y, config.floor.tile_width);
        let mut stats = BatchStats::default();
        stats.record_spawn();

        tracing::debug!(entrants = entrants.len(), %seed, "batch started");

        Ok(Self {
            retired: vec![None; entrants.len()],
            config,
            masks,
            rng,
            entrants,
            pipes,
            floor,
            stats,
            outputs: vec![0.0; max_outputs],
        })
    }

    /// Advances the world by one tick.
    ///
    /// Does nothing once the batch has finished.
    #[expect(clippy::cast_precision_loss)]
    pub fn tick(&mut self) -> TickReport {
        if self.entrants.is_empty() {
            return TickReport::default();
        }
        assert!(!self.pipes.is_empty(), "a running batch always has a pipe");

        let config = &self.config;
        let physics = &config.bird.physics;
        let rewards = config.fitness;

        // every bird senses the same pipe this tick
        let target = &self.pipes[self.target_pipe_index()];
        let (top_edge, bottom_edge) = (target.top_edge(), target.bottom_edge());

        for entrant in &mut self.entrants {
            entrant.bird.step(physics);
            entrant.fitness += rewards.survival_bonus;

            let inputs = sensor_values(&entrant.bird, top_edge, bottom_edge);
            let outputs = &mut self.outputs[..entrant.controller.output_len()];
            outputs.fill(0.0);
            entrant.controller.activate(&inputs, outputs);
            entrant
                .bird
                .apply_action(Action::from_output(outputs[0]), physics);
        }

        let mut passed = false;
        for pipe in &mut self.pipes {
            pipe.step(config.scroll_velocity);
            for entrant in &mut self.entrants {
                if entrant.removal.is_none() && pipe.collides_with(&entrant.bird, &self.masks) {
                    entrant.fitness -= rewards.collision_penalty;
                    entrant.removal = Some(DeathCause::PipeCollision);
                }
                if !pipe.is_passed() && pipe.x() < entrant.bird.x() {
                    pipe.mark_passed();
                    passed = true;
                }
            }
        }

        if passed {
            for entrant in self.entrants.iter_mut().filter(|e| e.removal.is_none()) {
                entrant.fitness += rewards.pass_bonus;
            }
            self.pipes
                .push(Pipe::new(config.pipe.spawn_x, &config.pipe, &mut self.rng));
            self.stats.record_spawn();
            self.stats.record_pass();
            tracing::trace!(
                tick = self.stats.ticks() + 1,
                score = self.stats.score(),
                "pipe passed"
            );
        }

        let bird_height = config.bird.height as f32;
        let floor_line = config.screen.floor_line;
        for entrant in self.entrants.iter_mut().filter(|e| e.removal.is_none()) {
            let y = entrant.bird.y();
            if y + bird_height >= floor_line {
                entrant.removal = Some(DeathCause::HitFloor);
            } else if y < 0.0 {
                entrant.removal = Some(DeathCause::HitCeiling);
            }
        }

        let removed = self.remove_marked();

        self.pipes.retain(|pipe| !pipe.is_off_screen());
        self.floor.step(self.config.scroll_velocity);
        self.stats.record_tick();

        if self.entrants.is_empty() {
            tracing::debug!(
                ticks = self.stats.ticks(),
                score = self.stats.score(),
                "batch finished"
            );
        }

        TickReport {
            passed,
            removed,
            alive: self.entrants.len(),
        }
    }

    /// Moves every marked entrant's final fitness into the retirement table and
    /// drops it from the live set in one pass.
    fn remove_marked(&mut self) -> Vec<(EntrantId, DeathCause)> {
        let before = self.entrants.len();
        let mut removed = vec![];
        let retired = &mut self.retired;
        self.entrants.retain(|entrant| {
            let Some(cause) = entrant.removal else {
                return true;
            };
            let slot = &mut retired[entrant.id.index()];
            assert!(slot.is_none(), "entrant {} removed twice", entrant.id);
            *slot = Some(Retirement {
                fitness: entrant.fitness,
                cause,
            });
            removed.push((entrant.id, cause));
            false
        });
        assert_eq!(
            self.entrants.len() + removed.len(),
            before,
            "removal lost track of entrants"
        );

        for &(id, cause) in &removed {
            self.stats.record_death(cause);
            tracing::trace!(%id, %cause, tick = self.stats.ticks() + 1, "bird removed");
        }
        removed
    }
}

impl<C> Batch<C> {
    /// Ends the batch and reports the fitness of every entrant.
    ///
    /// May be called at any point; birds still alive report their current
    /// fitness and no death cause.
    #[must_use]
    pub fn finish(self) -> BatchReport {
        let mut live = vec![None; self.retired.len()];
        for entrant in &self.entrants {
            live[entrant.id.index()] = Some(entrant.fitness);
        }

        let entrants = self
            .retired
            .iter()
            .zip(live)
            .enumerate()
            .map(|(index, (retired, live))| {
                let id = EntrantId(index);
                match (retired, live) {
                    (Some(retired), None) => EntrantOutcome {
                        id,
                        fitness: retired.fitness,
                        death_cause: Some(retired.cause),
                    },
                    (None, Some(fitness)) => EntrantOutcome {
                        id,
                        fitness,
                        death_cause: None,
                    },
                    _ => panic!("entrant {id} must be either alive or retired"),
                }
            })
            .collect();

        BatchReport {
            entrants,
            stats: self.stats,
        }
    }

    #[must_use]
    pub fn state(&self) -> BatchState {
        if self.entrants.is_empty() {
            BatchState::Finished
        } else {
            BatchState::Running
        }
    }

    /// Live birds in entrant order.
    pub fn birds(&self) -> impl ExactSizeIterator<Item = &Bird> {
        self.entrants.iter().map(|entrant| &entrant.bird)
    }

    pub fn entrants(&self) -> impl ExactSizeIterator<Item = EntrantView<'_>> {
        self.entrants.iter().map(|entrant| EntrantView {
            id: entrant.id,
            bird: &entrant.bird,
            fitness: entrant.fitness,
        })
    }

    /// Live pipes, oldest first.
    #[must_use]
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    #[must_use]
    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.stats.ticks()
    }

    #[must_use]
    pub fn alive(&self) -> usize {
        self.entrants.len()
    }

    /// Total number of entrants the batch started with.
    #[must_use]
    pub fn entrant_count(&self) -> usize {
        self.retired.len()
    }

    #[must_use]
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    #[must_use]
    pub fn masks(&self) -> &SpriteMasks {
        &self.masks
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Index of the pipe the birds sense next tick.
    ///
    /// The oldest pipe whose trailing edge the birds have not yet moved past,
    /// or the newest pipe if they are past all of them.
    #[must_use]
    pub fn target_pipe_index(&self) -> usize {
        let bird_x = self.config.bird.spawn_x;
        self.pipes
            .iter()
            .position(|pipe| pipe.trailing_edge() >= bird_x)
            .unwrap_or(self.pipes.len().saturating_sub(1))
    }

    /// Sensor readings `bird` would receive next tick.
    #[must_use]
    pub fn sensors(&self, bird: &Bird) -> [f32; SENSOR_COUNT] {
        let target = &self.pipes[self.target_pipe_index()];
        sensor_values(bird, target.top_edge(), target.bottom_edge())
    }
}

#[expect(clippy::cast_precision_loss)]
fn sensor_values(bird: &Bird, top_edge: i32, bottom_edge: i32) -> [f32; SENSOR_COUNT] {
    let y = bird.y();
    [
        y,
        (y - top_edge as f32).abs(),
        (y - bottom_edge as f32).abs(),
    ]
}
