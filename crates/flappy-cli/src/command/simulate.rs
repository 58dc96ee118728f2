use std::path::PathBuf;

use flappy_engine::Controller;
use flappy_evaluator::{batch_evaluator::BatchEvaluator, heuristic::GapFollower};

use crate::{
    command::WorldArg,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Path to the model file (JSON format)
    #[arg(long, required_unless_present = "heuristic")]
    model: Option<PathBuf>,
    /// Fly the built-in gap-following heuristic instead of a model
    #[arg(long, conflicts_with = "model")]
    heuristic: bool,
    /// Number of birds in the batch
    #[arg(long, default_value_t = 1)]
    birds: usize,
    /// Stop the batch after this many ticks
    #[arg(long, default_value_t = 10_000)]
    tick_limit: u64,
    #[clap(flatten)]
    world: WorldArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        model,
        heuristic: _,
        birds,
        tick_limit,
        world,
        output,
    } = arg;

    let controller: Box<dyn Controller> = match model {
        Some(path) => {
            let model = util::read_network_model_file(path)?;
            eprintln!(
                "Loaded model {:?} (generation {}, fitness {:.3})",
                model.name, model.generation, model.final_fitness
            );
            Box::new(model.network)
        }
        None => Box::new(GapFollower::default()),
    };

    let (config, seed) = world.load()?;
    let evaluator = BatchEvaluator::new(Some(*tick_limit));
    let report = evaluator.evaluate(config, seed, (0..*birds).map(|_| &*controller))?;

    eprintln!("Score: {}", report.score());
    eprintln!("Ticks: {}", report.ticks());
    if let Some(best) = report.best() {
        eprintln!("Best: bird {} with fitness {:.3}", best.id, best.fitness);
    }

    Output::save_json(&report, output.clone())
}
