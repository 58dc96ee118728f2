//! Genetic algorithm over fixed-topology network weights.
//!
//! Every individual is the flat weight vector of a [`FeedForwardNetwork`] with
//! the population's topology. The topology itself never changes; only the
//! weights evolve.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - All individuals fly together in one batch per seed
//! 2. **Elite Selection** - The best individuals are copied unchanged
//! 3. **Tournament Selection** - Parents are the fittest of small random groups
//! 4. **Crossover (BLX-α)** - Two parents are blended into one child
//! 5. **Mutation** - Gaussian noise is added to some of the child's weights
//!
//! # Shared Batches
//!
//! Individuals are not evaluated in isolation. The whole population flies the
//! same course at once, and the pass bonus goes to every bird still alive, so an
//! individual's fitness depends on how long the rest of its generation survives.
//! When several seeds are given, one batch runs per seed on its own thread and
//! fitness is averaged over the batches.
//!
//! # Example
//!
//! ```
//! use flappy_engine::{WorldConfig, WorldSeed};
//! use flappy_evaluator::batch_evaluator::BatchEvaluator;
//! use flappy_training::genetic::{Population, PopulationEvolver};
//!
//! let mut rng = rand::rng();
//! let mut population = Population::random(vec![3, 4, 1], 10, &mut rng, 5.0)?;
//! let evolver = PopulationEvolver::default();
//! let evaluator = BatchEvaluator::new(Some(1000));
//!
//! for _generation in 0..3 {
//!     population.evaluate_fitness(&WorldConfig::default(), &[WorldSeed::from_u128(1)], &evaluator)?;
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! # Ok::<(), flappy_training::TrainingError>(())
//! ```

use std::{panic, thread};

use flappy_engine::{BatchReport, WorldConfig, WorldSeed};
use flappy_evaluator::{
    batch_evaluator::BatchEvaluator,
    network::{self, FeedForwardNetwork, NetworkError},
};
use rand::{Rng, seq::IndexedRandom};

use crate::{TrainingError, statistics::FitnessStats, weights};

/// A candidate network: its weights and the fitness they earned.
#[derive(Debug, Clone)]
pub struct Individual {
    weights: Vec<f32>,
    fitness: f32,
}

impl Individual {
    /// Creates an individual with weights drawn from `[-max_weight, max_weight]`.
    pub fn random<R>(rng: &mut R, max_weight: f32, weight_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            weights: weights::random(rng, max_weight, weight_count),
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Fitness from the last evaluation (`f32::MIN` before the first one).
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// Individuals sharing one network topology.
#[derive(Debug, Clone)]
pub struct Population {
    topology: Vec<usize>,
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with random weights.
    pub fn random<R>(
        topology: Vec<usize>,
        count: usize,
        rng: &mut R,
        max_weight: f32,
    ) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        network::validate_topology(&topology)?;
        let weight_count = network::weight_count(&topology);
        let individuals = (0..count)
            .map(|_| Individual::random(rng, max_weight, weight_count))
            .collect();
        Ok(Self {
            topology,
            individuals,
        })
    }

    #[must_use]
    pub fn topology(&self) -> &[usize] {
        &self.topology
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Best individual of the last evaluation.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Builds one network per individual, in individual order.
    pub fn networks(&self) -> Result<Vec<FeedForwardNetwork>, NetworkError> {
        self.individuals
            .iter()
            .map(|ind| FeedForwardNetwork::new(self.topology.clone(), ind.weights.clone()))
            .collect()
    }

    /// Flies the whole population through one batch per seed and records the
    /// mean fitness.
    ///
    /// Batches run on separate threads. Afterwards individuals are sorted by
    /// fitness in descending order (best first).
    pub fn evaluate_fitness(
        &mut self,
        config: &WorldConfig,
        seeds: &[WorldSeed],
        evaluator: &BatchEvaluator,
    ) -> Result<Vec<BatchReport>, TrainingError> {
        let networks = self.networks()?;
        let results = thread::scope(|s| {
            let handles = seeds
                .iter()
                .map(|&seed| {
                    let networks = &networks;
                    s.spawn(move || evaluator.evaluate(config.clone(), seed, networks))
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
                .collect::<Vec<_>>()
        });
        let reports = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        self.record_fitness(&reports);
        Ok(reports)
    }

    /// Stores the mean fitness each individual earned in `reports`, then sorts
    /// individuals best first.
    ///
    /// Every report must come from a batch over [`networks`](Self::networks)
    /// in the current individual order.
    #[expect(clippy::cast_precision_loss)]
    pub fn record_fitness(&mut self, reports: &[BatchReport]) {
        if reports.is_empty() {
            return;
        }
        for ind in &mut self.individuals {
            ind.fitness = 0.0;
        }
        for report in reports {
            assert_eq!(
                report.entrants().len(),
                self.individuals.len(),
                "report does not match the population"
            );
            for outcome in report.entrants() {
                self.individuals[outcome.id.index()].fitness += outcome.fitness;
            }
        }
        let n = reports.len() as f32;
        for ind in &mut self.individuals {
            ind.fitness /= n;
        }

        // sort by fitness descending
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Controls how one generation becomes the next.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Number of top individuals copied unchanged (elitism)
    pub elite_count: usize,
    /// Weights are clipped to `[-max_weight, max_weight]`
    pub max_weight: f32,
    /// Tournament size for selection (larger = stronger selection pressure)
    pub tournament_size: usize,
    /// Standard deviation of the Gaussian mutation noise
    pub mutation_sigma: f32,
    /// BLX-α crossover parameter (exploration beyond the parents' range)
    pub blx_alpha: f32,
    /// Probability of mutating each weight
    pub mutation_rate: f32,
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self {
            elite_count: 2,
            max_weight: 5.0,
            tournament_size: 3,
            mutation_sigma: 0.5,
            blx_alpha: 0.5,
            mutation_rate: 0.2,
        }
    }
}

impl PopulationEvolver {
    /// Creates the next generation.
    ///
    /// `population` must be sorted by fitness descending, as left by
    /// [`Population::evaluate_fitness`]. The result has the same size and
    /// topology, and starts unevaluated.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let individuals = &population.individuals;
        assert!(
            individuals.is_sorted_by(|a, b| a.fitness >= b.fitness),
            "population must be sorted by fitness"
        );

        let elite_count = self.elite_count.min(individuals.len());
        let mut next_individuals = individuals[..elite_count]
            .iter()
            .map(|ind| Individual {
                weights: ind.weights.clone(),
                fitness: f32::MIN,
            })
            .collect::<Vec<_>>();

        while next_individuals.len() < individuals.len() {
            let p1 = tournament_select(individuals, self.tournament_size, rng);
            let p2 = tournament_select(individuals, self.tournament_size, rng);

            let mut child =
                weights::blx_alpha(&p1.weights, &p2.weights, self.blx_alpha, self.max_weight, rng);
            weights::mutate(
                &mut child,
                self.mutation_sigma,
                self.max_weight,
                self.mutation_rate,
                rng,
            );

            next_individuals.push(Individual {
                weights: child,
                fitness: f32::MIN,
            });
        }

        Population {
            topology: population.topology.clone(),
            individuals: next_individuals,
        }
    }
}

/// Returns the fittest of `tournament_size` distinct random individuals.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("tournament draws from a non-empty population")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn with_fitness(values: &[f32]) -> Population {
        Population {
            topology: vec![3, 1],
            individuals: values
                .iter()
                .map(|&fitness| Individual {
                    weights: vec![fitness / 10.0; 4],
                    fitness,
                })
                .collect(),
        }
    }

    #[test]
    fn test_random_population_matches_topology() {
        let population = Population::random(vec![3, 4, 1], 8, &mut rng(), 2.0).unwrap();
        assert_eq!(population.individuals().len(), 8);
        for ind in population.individuals() {
            assert_eq!(ind.weights().len(), 21);
            assert_eq!(ind.fitness(), f32::MIN);
        }
        assert_eq!(population.networks().unwrap().len(), 8);
    }

    #[test]
    fn test_random_population_rejects_bad_topology() {
        let err = Population::random(vec![4, 1], 8, &mut rng(), 2.0).unwrap_err();
        assert!(matches!(err, NetworkError::Topology { .. }));
    }

    #[test]
    fn test_evaluate_fitness_sorts_best_first() {
        let mut population = Population::random(vec![3, 2, 1], 12, &mut rng(), 3.0).unwrap();
        let evaluator = BatchEvaluator::new(Some(400));
        let seeds = [WorldSeed::from_u128(1), WorldSeed::from_u128(2)];
        let reports = population
            .evaluate_fitness(&WorldConfig::default(), &seeds, &evaluator)
            .unwrap();

        assert_eq!(reports.len(), 2);
        let fitness = population
            .individuals()
            .iter()
            .map(Individual::fitness)
            .collect::<Vec<_>>();
        assert!(fitness.is_sorted_by(|a, b| a >= b));
        // every bird earns the survival bonus at least once
        assert!(fitness.iter().all(|&f| f > f32::MIN));

        let best_in_reports = reports
            .iter()
            .map(|report| report.best().unwrap().fitness)
            .fold(f32::MIN, f32::max);
        assert!(population.best().unwrap().fitness() <= best_in_reports);
    }

    #[test]
    fn test_record_fitness_averages_by_entrant() {
        let mut population = Population::random(vec![3, 1], 3, &mut rng(), 1.0).unwrap();
        let networks = population.networks().unwrap();
        let evaluator = BatchEvaluator::new(Some(50));
        let report = evaluator
            .evaluate(WorldConfig::default(), WorldSeed::from_u128(9), &networks)
            .unwrap();
        let expected = report
            .entrants()
            .iter()
            .map(|outcome| (networks[outcome.id.index()].weights().to_vec(), outcome.fitness))
            .collect::<Vec<_>>();

        population.record_fitness(&[report.clone(), report]);
        for ind in population.individuals() {
            let (_, fitness) = expected
                .iter()
                .find(|(weights, _)| weights == ind.weights())
                .unwrap();
            assert!((ind.fitness() - fitness).abs() < 1e-5);
        }
    }

    #[test]
    fn test_evolve_keeps_size_and_elites() {
        let population = with_fitness(&[9.0, 7.0, 5.0, 3.0, 1.0]);
        let evolver = PopulationEvolver {
            elite_count: 2,
            ..PopulationEvolver::default()
        };
        let next = evolver.evolve(&population, &mut rng());
        assert_eq!(next.individuals().len(), 5);
        assert_eq!(next.topology(), &[3, 1]);
        assert_eq!(next.individuals()[0].weights(), &[0.9; 4]);
        assert_eq!(next.individuals()[1].weights(), &[0.7; 4]);
        for ind in next.individuals() {
            assert_eq!(ind.fitness(), f32::MIN);
            assert!(ind.weights().iter().all(|w| (-5.0..=5.0).contains(w)));
        }
    }

    #[test]
    #[should_panic(expected = "population must be sorted by fitness")]
    fn test_evolve_requires_sorted_population() {
        let population = with_fitness(&[1.0, 2.0]);
        let _ = PopulationEvolver::default().evolve(&population, &mut rng());
    }

    #[test]
    fn test_full_tournament_picks_the_best() {
        let population = with_fitness(&[1.0, 8.0, 3.0]);
        let mut rng = rng();
        for _ in 0..20 {
            let winner = tournament_select(&population.individuals, 3, &mut rng);
            assert_eq!(winner.fitness(), 8.0);
        }
    }
}
