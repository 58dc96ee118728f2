use std::slice;

use crossterm::event::{Event, KeyCode};
use flappy_engine::{Batch, BatchReport, WorldConfig, WorldSeed};
use flappy_evaluator::network::{FeedForwardNetwork, NetworkError};
use flappy_training::{
    genetic::{Population, PopulationEvolver},
    statistics::FitnessStats,
};
use rand::Rng as _;
use rand_pcg::Pcg32;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::Block,
};

use crate::{
    tui::{App, RenderMode, Runtime},
    ui::widgets::{self, StatsDisplay, WorldDisplay, style},
};

const FPS: f64 = 60.0;
/// Batch ticks per frame in turbo mode.
const TURBO_TICKS: usize = 50;

/// Where the birds of each round come from.
#[derive(Debug)]
pub enum Flock {
    /// Copies of one trained network.
    Model {
        network: FeedForwardNetwork,
        count: usize,
    },
    /// A population that evolves after every round.
    Training {
        population: Population,
        evolver: PopulationEvolver,
    },
}

impl Flock {
    pub fn model(network: FeedForwardNetwork, count: usize) -> Self {
        Self::Model { network, count }
    }

    pub fn training(population: Population, evolver: PopulationEvolver) -> Self {
        Self::Training {
            population,
            evolver,
        }
    }

    fn networks(&self) -> Result<Vec<FeedForwardNetwork>, NetworkError> {
        match self {
            Flock::Model { network, count } => Ok(vec![network.clone(); *count]),
            Flock::Training { population, .. } => population.networks(),
        }
    }

    fn round_name(&self) -> &'static str {
        match self {
            Flock::Model { .. } => "RUN",
            Flock::Training { .. } => "GENERATION",
        }
    }

    /// Feeds a finished round back into the flock.
    ///
    /// A training flock records the fitness of its individuals and breeds the
    /// next generation; the returned statistics describe the finished one.
    fn finish_round(&mut self, report: &BatchReport, rng: &mut Pcg32) -> Option<FitnessStats> {
        match self {
            Flock::Model { .. } => None,
            Flock::Training {
                population,
                evolver,
            } => {
                population.record_fitness(slice::from_ref(report));
                let stats = population.compute_fitness_stats();
                *population = evolver.evolve(population, rng);
                stats
            }
        }
    }
}

/// Summary of the last finished round.
#[derive(Debug, Clone)]
struct RoundSummary {
    score: u32,
    ticks: u64,
    fitness: Option<FitnessStats>,
}

#[derive(Debug)]
pub struct WatchApp {
    config: WorldConfig,
    rng: Pcg32,
    flock: Flock,
    tick_limit: Option<u64>,
    seed: WorldSeed,
    batch: Option<Batch<FeedForwardNetwork>>,
    round: usize,
    best_score: u32,
    last_round: Option<RoundSummary>,
    paused: bool,
    turbo: bool,
    is_exiting: bool,
    error: Option<anyhow::Error>,
}

impl WatchApp {
    pub fn new(
        config: WorldConfig,
        seed: WorldSeed,
        rng: Pcg32,
        flock: Flock,
        tick_limit: Option<u64>,
    ) -> anyhow::Result<Self> {
        let batch = Batch::new(config.clone(), seed, flock.networks()?)?;
        Ok(Self {
            config,
            rng,
            flock,
            tick_limit,
            seed,
            batch: Some(batch),
            round: 0,
            best_score: 0,
            last_round: None,
            paused: false,
            turbo: false,
            is_exiting: false,
            error: None,
        })
    }

    pub fn turbo(self, turbo: bool) -> Self {
        Self { turbo, ..self }
    }

    /// Ends the current round and reports why the app stopped.
    pub fn finish(self) -> anyhow::Result<()> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if let Some(batch) = self.batch {
            let report = batch.finish();
            eprintln!(
                "Stopped in {} #{} (seed {}): score {}, ticks {}, best score {}",
                self.flock.round_name().to_lowercase(),
                self.round,
                self.seed,
                report.score(),
                report.ticks(),
                u32::max(self.best_score, report.score()),
            );
        }
        Ok(())
    }

    /// Advances the world by one tick, starting the next round when the
    /// current one is over.
    fn step(&mut self) -> anyhow::Result<()> {
        let Some(batch) = &mut self.batch else {
            return Ok(());
        };
        let limit_reached = self.tick_limit.is_some_and(|limit| batch.ticks() >= limit);
        if batch.state().is_running() && !limit_reached {
            batch.tick();
            return Ok(());
        }
        self.next_round()
    }

    fn next_round(&mut self) -> anyhow::Result<()> {
        let Some(batch) = self.batch.take() else {
            return Ok(());
        };
        let report = batch.finish();
        let fitness = self.flock.finish_round(&report, &mut self.rng);
        self.best_score = u32::max(self.best_score, report.score());
        self.last_round = Some(RoundSummary {
            score: report.score(),
            ticks: report.ticks(),
            fitness,
        });

        self.round += 1;
        self.seed = self.rng.random();
        self.batch = Some(Batch::new(
            self.config.clone(),
            self.seed,
            self.flock.networks()?,
        )?);
        Ok(())
    }

    fn help_text(&self) -> String {
        let turbo_text = if self.turbo {
            "t (Turbo: ON)"
        } else {
            "t (Turbo: OFF)"
        };
        if self.paused {
            "Controls: p (Resume) | q (Quit)".to_owned()
        } else {
            format!("Controls: {turbo_text} | p (Pause) | q (Quit)")
        }
    }
}

impl App for WatchApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(FPS));
        runtime.set_render_mode(RenderMode::from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Char('t') if !self.paused => self.turbo = !self.turbo,
                KeyCode::Char('p') => self.paused = !self.paused,
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(help_text, help_area);

        let Some(batch) = &self.batch else {
            return;
        };
        let border_color = widgets::border_color(self.paused, self.turbo);
        let title = if self.paused {
            format!(" {} #{} (PAUSED) ", self.flock.round_name(), self.round)
        } else {
            format!(" {} #{} ", self.flock.round_name(), self.round)
        };

        let mut stats = StatsDisplay::new(batch).row("HIGH", self.best_score);
        if let Some(last) = &self.last_round {
            stats = stats
                .row("LAST SCORE", last.score)
                .row("LAST TICKS", last.ticks);
            if let Some(fitness) = &last.fitness {
                stats = stats
                    .row("LAST MAX", format!("{:.1}", fitness.max))
                    .row("LAST MEAN", format!("{:.1}", fitness.mean));
            }
        }
        let stats = stats.block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .border_style(border_color)
                .style(style::DEFAULT),
        );

        // terminal cells are about twice as tall as wide
        let screen = &batch.config().screen;
        let world_height = main_area.height.saturating_sub(2);
        let world_width = u64::from(world_height) * 2 * u64::from(screen.width)
            / u64::from(screen.height);
        let world_width = u16::try_from(world_width)
            .unwrap_or(u16::MAX)
            .saturating_add(2);

        let [world_area, stats_area] = Layout::horizontal([
            Constraint::Max(world_width),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_area);

        let world = WorldDisplay::new(batch).block(
            Block::bordered()
                .title(Line::from(title).centered())
                .border_style(border_color)
                .style(style::DEFAULT),
        );
        frame.render_widget(world, world_area);
        frame.render_widget(stats, stats_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        if self.paused || self.is_exiting {
            return;
        }
        let steps = if self.turbo { TURBO_TICKS } else { 1 };
        for _ in 0..steps {
            if let Err(err) = self.step() {
                self.error = Some(err);
                self.is_exiting = true;
                return;
            }
        }
    }
}
