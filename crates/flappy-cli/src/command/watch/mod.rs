use std::path::PathBuf;

use flappy_training::genetic::{Population, PopulationEvolver};

use self::app::{Flock, WatchApp};
use crate::{
    command::{WorldArg, train},
    tui::Runtime,
    util,
};

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WatchArg {
    /// Path to a trained model (a population is trained live if omitted)
    #[arg(long)]
    model: Option<PathBuf>,
    /// Number of birds per batch
    #[arg(long, default_value_t = 30)]
    population: usize,
    /// Neurons in the hidden layer of live-trained networks
    #[arg(long, default_value_t = 4, conflicts_with = "model")]
    hidden: usize,
    /// Stop each batch after this many ticks
    #[arg(long)]
    tick_limit: Option<u64>,
    /// Start in turbo mode
    #[arg(long)]
    turbo: bool,
    #[clap(flatten)]
    world: WorldArg,
}

impl Default for WatchArg {
    fn default() -> Self {
        Self {
            model: None,
            population: 30,
            hidden: 4,
            tick_limit: None,
            turbo: false,
            world: WorldArg::default(),
        }
    }
}

pub(crate) fn run(arg: &WatchArg) -> anyhow::Result<()> {
    let WatchArg {
        model,
        population,
        hidden,
        tick_limit,
        turbo,
        world,
    } = arg;
    anyhow::ensure!(*population > 0, "at least one bird is required");

    let (config, seed) = world.load()?;
    let mut rng = seed.rng();
    let flock = match model {
        Some(path) => {
            let model = util::read_network_model_file(path)?;
            Flock::model(model.network, *population)
        }
        None => {
            let evolver = PopulationEvolver::default();
            let population = Population::random(
                train::topology(*hidden),
                *population,
                &mut rng,
                evolver.max_weight,
            )?;
            Flock::training(population, evolver)
        }
    };

    let mut app = WatchApp::new(config, seed, rng, flock, *tick_limit)?.turbo(*turbo);
    Runtime::new().run(&mut app)?;
    app.finish()
}
