//! SA execution loop.

use super::config::SaConfig;
use crate::error::{Error, Result};
use crate::ga::Population;
use crate::individual::{Individual, Problem};
use rand::Rng;
use tracing::instrument;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<G> {
    /// The best individual seen during the run.
    pub elite: Individual<G>,

    /// Where the search was when the temperature ran out.
    ///
    /// Never better than `elite`, and often worse.
    pub final_position: Individual<G>,

    /// Number of chains run (one per temperature).
    pub temperature_steps: usize,

    /// Total number of neighbour evaluations.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Temperature when the algorithm stopped.
    pub final_temperature: f64,
}

/// Executes the Simulated Annealing algorithm.
///
/// # Algorithm
///
/// Starting from a uniformly drawn member of the pool, with temperature
/// `T = initial_temperature`:
///
/// 1. While `T > threshold`, run `chain_length` moves:
///    - pick one neighbour of the current position uniformly
///    - if it is not worse, accept it (and record it as the elite when it
///      beats the elite)
///    - otherwise accept it when a uniform draw falls below
///      `exp(-|Δfitness| / T)` (Metropolis criterion)
/// 2. Cool: `T ← alpha · T`
///
/// Returns the elite, not the final position.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from a random member of `pool`, using the pool's problem
    /// and optimization direction.
    ///
    /// # Errors
    /// - [`Error::Config`] for an invalid configuration
    /// - [`Error::Domain`] if the problem has no neighbourhood, a position
    ///   has no neighbours, or a neighbour cannot be evaluated
    #[instrument(
        level = "debug",
        skip_all,
        fields(optim = %pool.optim(), chain_length = config.chain_length)
    )]
    pub fn run<P, R>(
        pool: &Population<'_, P>,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::Gene>>
    where
        P: Problem + ?Sized,
        R: Rng,
    {
        config.validate()?;
        let problem = pool.problem();
        let optim = pool.optim();

        let mut position = pool.random_member(rng).clone();
        let mut elite = position.clone();
        tracing::debug!(start = position.fitness(), "Annealing started");

        let mut temperature = config.initial_temperature;
        let mut temperature_steps = 0usize;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        while temperature > config.threshold {
            for _ in 0..config.chain_length {
                let neighbour = random_neighbour(problem, &position, rng)?;
                iterations += 1;

                let accept = if optim.is_not_worse(neighbour.fitness(), position.fitness()) {
                    if optim.is_better(neighbour.fitness(), position.fitness()) {
                        improving_moves += 1;
                    }
                    true
                } else {
                    // Metropolis acceptance criterion
                    let delta = (neighbour.fitness() - position.fitness()).abs();
                    let probability = (-delta / temperature).exp();
                    rng.random::<f64>() < probability
                };

                if accept {
                    position = neighbour;
                    accepted_moves += 1;
                    if optim.is_better(position.fitness(), elite.fitness()) {
                        elite = position.clone();
                        tracing::trace!(elite = elite.fitness(), temperature, "New elite");
                    }
                }
            }

            temperature *= config.alpha;
            temperature_steps += 1;
            tracing::debug!(
                step = temperature_steps,
                temperature,
                position = position.fitness(),
                elite = elite.fitness(),
                "Cooled"
            );
        }

        tracing::info!(
            elite = elite.fitness(),
            iterations,
            accepted_moves,
            "Annealing finished"
        );

        Ok(SaResult {
            elite,
            final_position: position,
            temperature_steps,
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
        })
    }
}

/// Runs SA and returns only the elite.
///
/// `l`, `c`, `alpha` and `threshold` are [`SaConfig::chain_length`],
/// [`SaConfig::initial_temperature`], [`SaConfig::alpha`] and
/// [`SaConfig::threshold`].
///
/// # Errors
/// [`Error::Config`](crate::Error::Config) unless `threshold < c`; a
/// schedule with no cooling steps is rejected rather than returning the
/// starting point. See [`SaRunner::run`] for the other errors.
pub fn simulated_annealing<P, R>(
    pool: &Population<'_, P>,
    l: usize,
    c: f64,
    alpha: f64,
    threshold: f64,
    rng: &mut R,
) -> Result<Individual<P::Gene>>
where
    P: Problem + ?Sized,
    R: Rng,
{
    let config = SaConfig {
        chain_length: l,
        initial_temperature: c,
        alpha,
        threshold,
    };
    SaRunner::run(pool, &config, rng).map(|result| result.elite)
}

/// Builds and evaluates one uniformly chosen neighbour.
fn random_neighbour<P, R>(
    problem: &P,
    position: &Individual<P::Gene>,
    rng: &mut R,
) -> Result<Individual<P::Gene>>
where
    P: Problem + ?Sized,
    R: Rng,
{
    let mut neighbours = problem.neighbours(position.representation())?;
    if neighbours.is_empty() {
        return Err(Error::domain(format!(
            "no neighbours for {:?}",
            position.representation()
        )));
    }
    let pick = neighbours.swap_remove(rng.random_range(0..neighbours.len()));
    Individual::new(problem, pick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Encoding;
    use crate::optim::Optim;
    use crate::random::create_rng;
    use crate::testing::{NQueens, OneMax, Sphere};

    fn queens_pool<'p>(queens: &'p NQueens, seed: u64) -> Population<'p, NQueens> {
        let mut rng = create_rng(seed);
        let encoding = Encoding::permutation((0..queens.n).collect());
        Population::new(queens, 10, Optim::Maximize, &encoding, &mut rng).unwrap()
    }

    #[test]
    fn test_sa_exact_step_count() {
        let queens = NQueens::new(6);
        for seed in [1, 2, 3] {
            let pool = queens_pool(&queens, seed);
            let mut rng = create_rng(seed);
            let config = SaConfig::default();
            let result = SaRunner::run(&pool, &config, &mut rng).unwrap();

            let expected = ((0.05f64 / 10.0).ln() / 0.95f64.ln()).ceil() as usize;
            assert_eq!(result.temperature_steps, expected);
            assert_eq!(result.iterations, expected * 20);
            assert!(result.final_temperature <= 0.05);
        }
    }

    #[test]
    fn test_sa_elite_never_worse_than_final_position() {
        let queens = NQueens::new(8);
        let pool = queens_pool(&queens, 42);
        let mut rng = create_rng(42);
        let result = SaRunner::run(&pool, &SaConfig::default(), &mut rng).unwrap();
        assert!(result.elite.fitness() >= result.final_position.fitness());
        assert!(result.accepted_moves >= result.improving_moves);
        assert!(result.accepted_moves <= result.iterations);
    }

    #[test]
    fn test_sa_eight_queens_improves() {
        let queens = NQueens::new(8);
        let pool = queens_pool(&queens, 7);
        let mut rng = create_rng(7);
        let config = SaConfig::default()
            .with_chain_length(100)
            .with_alpha(0.98);
        let result = SaRunner::run(&pool, &config, &mut rng).unwrap();
        assert!(result.elite.fitness() >= queens.max_fitness() - 1.0);
    }

    #[test]
    fn test_sa_respects_minimize() {
        let mut rng = create_rng(3);
        let encoding = Encoding::with_replacement(10, vec![0u8, 1]);
        let pool = Population::new(&OneMax, 5, Optim::Minimize, &encoding, &mut rng).unwrap();
        let elite = simulated_annealing(&pool, 20, 10.0, 0.95, 0.05, &mut rng).unwrap();
        assert!(elite.fitness() <= 1.0, "elite {elite}");
    }

    #[test]
    fn test_sa_without_neighbourhood_is_domain_error() {
        let mut rng = create_rng(1);
        let ind = Individual::new(&Sphere, vec![1.0, 2.0]).unwrap();
        let pool = Population::from_individuals(&Sphere, Optim::Minimize, vec![ind]).unwrap();
        assert!(matches!(
            SaRunner::run(&pool, &SaConfig::default(), &mut rng),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn test_sa_empty_neighbourhood_is_domain_error() {
        let mut rng = create_rng(1);
        let ind = Individual::new(&OneMax, Vec::new()).unwrap();
        let pool = Population::from_individuals(&OneMax, Optim::Maximize, vec![ind]).unwrap();
        assert!(matches!(
            simulated_annealing(&pool, 20, 10.0, 0.95, 0.05, &mut rng),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn test_sa_invalid_config() {
        let queens = NQueens::new(4);
        let pool = queens_pool(&queens, 1);
        let mut rng = create_rng(1);
        assert!(matches!(
            simulated_annealing(&pool, 20, 10.0, 1.2, 0.05, &mut rng),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_sa_threshold_not_below_start_temperature_is_config_error() {
        let queens = NQueens::new(4);
        let pool = queens_pool(&queens, 1);
        let mut rng = create_rng(1);
        for c in [0.05, 0.01] {
            assert!(matches!(
                simulated_annealing(&pool, 20, c, 0.95, 0.05, &mut rng),
                Err(Error::Config(_))
            ));
        }
    }

    #[test]
    fn test_sa_metropolis_accepts_downhill_at_high_temperature() {
        // Every OneMax move changes fitness by exactly 1; at T = 1e6 nearly
        // every worsening move is accepted.
        let mut rng = create_rng(5);
        let ind = Individual::new(&OneMax, vec![1u8; 12]).unwrap();
        let pool = Population::from_individuals(&OneMax, Optim::Maximize, vec![ind]).unwrap();
        let config = SaConfig::default()
            .with_initial_temperature(1e6)
            .with_threshold(1e5)
            .with_alpha(0.5)
            .with_chain_length(50);
        let result = SaRunner::run(&pool, &config, &mut rng).unwrap();
        assert!(result.accepted_moves as f64 > 0.95 * result.iterations as f64);
        // elite is the all-ones start: nothing beats it
        assert_eq!(result.elite.fitness(), 12.0);
    }
}
