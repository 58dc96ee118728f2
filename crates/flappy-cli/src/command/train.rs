use std::path::PathBuf;

use chrono::Utc;
use flappy_engine::{BatchReport, DeathCause, SENSOR_COUNT, WorldSeed};
use flappy_evaluator::{batch_evaluator::BatchEvaluator, network::FeedForwardNetwork};
use flappy_training::genetic::{Individual, Population, PopulationEvolver};
use rand::Rng as _;

use crate::{command::WorldArg, model::network_model::NetworkModel, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Maximum number of generations
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Individuals per generation
    #[arg(long, default_value_t = 30)]
    population: usize,
    /// Neurons in the hidden layer (0 connects sensors straight to the output)
    #[arg(long, default_value_t = 4)]
    hidden: usize,
    /// Batches flown per generation, each on its own course
    #[arg(long, default_value_t = 1)]
    batches: usize,
    /// Stop a batch after this many ticks
    #[arg(long, default_value_t = 10_000)]
    tick_limit: u64,
    /// Stop training once the best fitness reaches this value
    #[arg(long)]
    fitness_threshold: Option<f32>,
    /// Name stored in the model file
    #[arg(long, default_value = "flappy")]
    name: String,
    #[clap(flatten)]
    world: WorldArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Layer sizes for a network with one hidden layer of `hidden` neurons.
pub(super) fn topology(hidden: usize) -> Vec<usize> {
    if hidden == 0 {
        vec![SENSOR_COUNT, 1]
    } else {
        vec![SENSOR_COUNT, hidden, 1]
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        generations,
        population: population_size,
        hidden,
        batches,
        tick_limit,
        fitness_threshold,
        name,
        world,
        output,
    } = arg;
    anyhow::ensure!(*generations > 0, "at least one generation is required");
    anyhow::ensure!(*population_size > 0, "population must not be empty");
    anyhow::ensure!(*batches > 0, "at least one batch per generation is required");

    let (config, seed) = world.load()?;
    let evaluator = BatchEvaluator::new(Some(*tick_limit));
    let evolver = PopulationEvolver::default();

    let mut rng = seed.rng();
    let mut population = Population::random(
        topology(*hidden),
        *population_size,
        &mut rng,
        evolver.max_weight,
    )?;

    let mut generation = 0;
    loop {
        let seeds = (0..*batches)
            .map(|_| rng.random())
            .collect::<Vec<WorldSeed>>();
        let reports = population.evaluate_fitness(&config, &seeds, &evaluator)?;
        print_generation(generation, &population, &seeds, &reports);

        let best_fitness = population.best().map_or(f32::MIN, Individual::fitness);
        if fitness_threshold.is_some_and(|threshold| best_fitness >= threshold) {
            eprintln!("Fitness threshold reached at generation #{generation}.");
            break;
        }
        if generation + 1 >= *generations {
            break;
        }
        population = evolver.evolve(&population, &mut rng);
        generation += 1;
    }

    eprintln!("Training completed.");

    let best = population
        .best()
        .ok_or_else(|| anyhow::anyhow!("population is empty"))?;
    let model = NetworkModel {
        name: name.clone(),
        trained_at: Utc::now(),
        generation,
        final_fitness: best.fitness(),
        network: FeedForwardNetwork::new(population.topology().to_vec(), best.weights().to_vec())?,
    };
    Output::save_json(&model, output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Generation: {}", model.generation);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Topology: {:?}", model.network.topology());

    Ok(())
}

fn print_generation(
    generation: usize,
    population: &Population,
    seeds: &[WorldSeed],
    reports: &[BatchReport],
) {
    eprintln!("Generation #{generation}:");

    eprintln!("  Batches:");
    for (seed, report) in seeds.iter().zip(reports) {
        let stats = report.stats();
        let deaths = [
            DeathCause::PipeCollision,
            DeathCause::HitFloor,
            DeathCause::HitCeiling,
        ]
        .map(|cause| stats.deaths(cause));
        eprintln!(
            "    {seed}: score {:4}, ticks {:6}, deaths (pipe/floor/ceiling) {:?}",
            report.score(),
            report.ticks(),
            deaths,
        );
    }

    eprintln!("  Top Individuals:");
    for (i, ind) in population.individuals().iter().take(5).enumerate() {
        eprintln!("  {i:2}: {:.3}", ind.fitness());
    }

    if let Some(stats) = population.compute_fitness_stats() {
        eprintln!("  Fitness Stats:");
        eprintln!("    Min:    {:.3}", stats.min);
        eprintln!("    Max:    {:.3}", stats.max);
        eprintln!("    Mean:   {:.3}", stats.mean);
        eprintln!("    Median: {:.3}", stats.median);
        eprintln!("    StdDev: {:.3}", stats.std_dev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Mode, tests::parse};

    #[test]
    fn test_seed_must_be_hex() {
        let args = parse(&["train", "--seed", "000000000000000000000000000000ff"]).unwrap();
        let Some(Mode::Train(arg)) = args.mode else {
            panic!("expected train mode");
        };
        assert_eq!(arg.world.seed, Some(WorldSeed::from_u128(0xff)));
        assert_eq!(arg.generations, 50);
        assert_eq!(arg.tick_limit, 10_000);

        assert!(parse(&["train", "--seed", "ff"]).is_err());
        assert!(parse(&["train", "--seed", "not hex"]).is_err());
    }

    #[test]
    fn test_topology() {
        assert_eq!(topology(0), [3, 1]);
        assert_eq!(topology(4), [3, 4, 1]);
    }
}
