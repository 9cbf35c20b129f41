//! Hill climbing loop.

use super::config::HillClimbConfig;
use crate::error::Result;
use crate::ga::Population;
use crate::individual::{Individual, Problem};
use rand::Rng;
use tracing::instrument;

/// Result of a hill climbing run.
#[derive(Debug, Clone)]
pub struct HillClimbResult<G> {
    /// Final position of the climber.
    pub final_position: Individual<G>,

    /// Neighbourhoods evaluated.
    pub iterations: usize,

    /// Moves to a strictly better neighbour.
    pub improving_moves: usize,

    /// Moves to an equally good neighbour.
    pub plateau_moves: usize,
}

/// Executes hill climbing.
///
/// # Algorithm
///
/// Starting from a uniformly drawn member of the pool:
///
/// 1. Evaluate every neighbour and take the best (earliest on ties)
/// 2. Strictly better: move there and reset the no-improvement counter
/// 3. Equally good: move there and increment the counter
/// 4. Worse: stay and increment the counter
///
/// The climb ends when the counter reaches `max_no_improvement` or the
/// position has no neighbours.
pub struct HillClimbRunner;

impl HillClimbRunner {
    /// Runs hill climbing from a random member of `pool`, using the pool's
    /// problem and optimization direction.
    ///
    /// # Errors
    /// - [`Error::Config`](crate::Error::Config) for an invalid configuration
    /// - [`Error::Domain`](crate::Error::Domain) if the problem has no
    ///   neighbourhood or a neighbour cannot be evaluated
    #[instrument(
        level = "debug",
        skip_all,
        fields(optim = %pool.optim(), max_no_improvement = config.max_no_improvement)
    )]
    pub fn run<P, R>(
        pool: &Population<'_, P>,
        config: &HillClimbConfig,
        rng: &mut R,
    ) -> Result<HillClimbResult<P::Gene>>
    where
        P: Problem + ?Sized,
        R: Rng,
    {
        config.validate()?;
        let problem = pool.problem();
        let optim = pool.optim();

        let mut position = pool.random_member(rng).clone();
        tracing::debug!(start = position.fitness(), "Climb started");

        let mut no_improvement = 0usize;
        let mut iterations = 0usize;
        let mut improving_moves = 0usize;
        let mut plateau_moves = 0usize;

        while no_improvement < config.max_no_improvement {
            let mut neighbours = position.neighbours(problem)?;
            let Some(best) = optim.best_index(neighbours.iter().map(Individual::fitness)) else {
                tracing::debug!("Empty neighbourhood");
                break;
            };
            let candidate = neighbours.swap_remove(best);
            iterations += 1;

            if optim.is_better(candidate.fitness(), position.fitness()) {
                tracing::trace!(fitness = candidate.fitness(), "Improving move");
                position = candidate;
                no_improvement = 0;
                improving_moves += 1;
            } else if candidate.fitness() == position.fitness() {
                position = candidate;
                no_improvement += 1;
                plateau_moves += 1;
            } else {
                // Staying put would see the same neighbourhood again.
                no_improvement = config.max_no_improvement;
            }
        }

        tracing::info!(
            fitness = position.fitness(),
            iterations,
            improving_moves,
            plateau_moves,
            "Climb finished"
        );

        Ok(HillClimbResult {
            final_position: position,
            iterations,
            improving_moves,
            plateau_moves,
        })
    }
}

/// Runs hill climbing and returns only the final position.
pub fn hill_climb<P, R>(
    pool: &Population<'_, P>,
    max_no_improvement: usize,
    rng: &mut R,
) -> Result<Individual<P::Gene>>
where
    P: Problem + ?Sized,
    R: Rng,
{
    let config = HillClimbConfig { max_no_improvement };
    HillClimbRunner::run(pool, &config, rng).map(|result| result.final_position)
}
