//! Population and the generational loop.
//!
//! [`Population::evolve`] runs: selection → crossover → mutation →
//! replacement (with optional elitism), once per generation.

use super::config::EvolveConfig;
use super::selection::Selection;
use crate::error::{Error, Result};
use crate::individual::{Encoding, Individual, Problem};
use crate::optim::Optim;
use rand::Rng;
use tracing::instrument;

/// How many times the second parent is redrawn before giving up.
///
/// A selection that keeps returning the first parent (e.g. a roulette
/// wheel where one member holds all the fitness) is reported as
/// [`Error::DegenerateInput`] after this many attempts.
pub const MAX_PARENT_REDRAWS: usize = 1000;

/// Fitness summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,
    pub best_fitness: f64,
    pub worst_fitness: f64,
    pub mean_fitness: f64,
}

/// A fixed-size set of individuals evaluated against one problem.
///
/// # Examples
///
/// ```
/// use charles::ga::{Crossover, EvolveConfig, Mutation, Population};
/// use charles::random::create_rng;
/// use charles::{Encoding, Optim, Problem, Result};
///
/// struct OneMax;
///
/// impl Problem for OneMax {
///     type Gene = u8;
///     fn fitness(&self, bits: &[u8]) -> Result<f64> {
///         Ok(bits.iter().map(|&b| b as f64).sum())
///     }
/// }
///
/// let mut rng = create_rng(42);
/// let encoding = Encoding::with_replacement(16, vec![0u8, 1]);
/// let mut pop = Population::new(&OneMax, 20, Optim::Maximize, &encoding, &mut rng).unwrap();
///
/// let config = EvolveConfig::default()
///     .with_generations(30)
///     .with_crossover(Crossover::SinglePoint)
///     .with_mutation(Mutation::BinaryFlip);
/// pop.evolve(&config, &mut rng).unwrap();
///
/// assert_eq!(pop.len(), 20);
/// assert_eq!(pop.generation(), 30);
/// assert_eq!(pop.history().len(), 31);
/// ```
pub struct Population<'p, P: Problem + ?Sized> {
    problem: &'p P,
    optim: Optim,
    individuals: Vec<Individual<P::Gene>>,
    generation: usize,
    history: Vec<GenerationStats>,
}

impl<'p, P: Problem + ?Sized> Population<'p, P> {
    /// Builds `size` random individuals from `encoding`.
    ///
    /// # Errors
    /// - [`Error::Config`] if `size` is zero or the encoding cannot be sampled
    /// - any error the problem's fitness function reports
    pub fn new<R: Rng>(
        problem: &'p P,
        size: usize,
        optim: Optim,
        encoding: &Encoding<P::Gene>,
        rng: &mut R,
    ) -> Result<Self> {
        if size == 0 {
            return Err(Error::config("population size must be at least 1"));
        }
        encoding.validate()?;
        let individuals = (0..size)
            .map(|_| Individual::random(problem, encoding, rng))
            .collect::<Result<Vec<_>>>()?;
        Self::from_individuals(problem, optim, individuals)
    }

    /// Wraps already evaluated individuals.
    ///
    /// The individuals are assumed to have been built against `problem`.
    pub fn from_individuals(
        problem: &'p P,
        optim: Optim,
        individuals: Vec<Individual<P::Gene>>,
    ) -> Result<Self> {
        if individuals.is_empty() {
            return Err(Error::config("population must not be empty"));
        }
        let mut population = Self {
            problem,
            optim,
            individuals,
            generation: 0,
            history: Vec::new(),
        };
        population.history.push(population.stats());
        Ok(population)
    }

    pub fn problem(&self) -> &'p P {
        self.problem
    }

    pub fn optim(&self) -> Optim {
        self.optim
    }

    pub fn individuals(&self) -> &[Individual<P::Gene>] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Always `false`: construction rejects empty populations.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Statistics for every generation so far, starting with generation 0.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Best member under the population's direction (earliest on ties).
    pub fn best_indv(&self) -> &Individual<P::Gene> {
        let i = self
            .optim
            .best_index(self.individuals.iter().map(Individual::fitness))
            .unwrap_or(0);
        &self.individuals[i]
    }

    /// Worst member under the population's direction (earliest on ties).
    pub fn worst_indv(&self) -> &Individual<P::Gene> {
        &self.individuals[self.worst_index()]
    }

    pub fn mean_fitness(&self) -> f64 {
        self.individuals.iter().map(Individual::fitness).sum::<f64>() / self.len() as f64
    }

    /// Summary of the current generation.
    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            generation: self.generation,
            best_fitness: self.best_indv().fitness(),
            worst_fitness: self.worst_indv().fitness(),
            mean_fitness: self.mean_fitness(),
        }
    }

    /// Picks one member with the given strategy.
    pub fn select<R: Rng>(&self, selection: Selection, rng: &mut R) -> Result<&Individual<P::Gene>> {
        let i = selection.select(&self.individuals, self.optim, rng)?;
        Ok(&self.individuals[i])
    }

    pub(crate) fn random_member<R: Rng>(&self, rng: &mut R) -> &Individual<P::Gene> {
        &self.individuals[rng.random_range(0..self.individuals.len())]
    }

    fn worst_index(&self) -> usize {
        self.optim
            .worst_index(self.individuals.iter().map(Individual::fitness))
            .unwrap_or(0)
    }

    /// Runs `config.generations` generations.
    ///
    /// Each generation is assembled in a fresh vector and only replaces
    /// the current one once it is complete, so an error leaves the
    /// population as it was after the last finished generation.
    ///
    /// # Errors
    /// - [`Error::Config`] for an invalid config or a population smaller than 2
    /// - [`Error::DegenerateInput`] if selection cannot produce two distinct
    ///   parents within [`MAX_PARENT_REDRAWS`] attempts, or a roulette wheel
    ///   is undefined
    /// - [`Error::Domain`] from operators or the fitness function
    #[instrument(
        level = "debug",
        skip_all,
        fields(size = self.individuals.len(), optim = %self.optim, generations = config.generations)
    )]
    pub fn evolve<R: Rng>(&mut self, config: &EvolveConfig, rng: &mut R) -> Result<()> {
        config.validate()?;
        if self.individuals.len() < 2 {
            return Err(Error::config(
                "evolution needs a population of at least 2 to draw distinct parents",
            ));
        }

        for _ in 0..config.generations {
            let next = self.breed(config, rng)?;
            self.individuals = next;
            self.generation += 1;

            let stats = self.stats();
            tracing::debug!(
                generation = stats.generation,
                best = stats.best_fitness,
                worst = stats.worst_fitness,
                mean = stats.mean_fitness,
                "Generation complete"
            );
            self.history.push(stats);
        }

        tracing::info!(
            generation = self.generation,
            best_fitness = self.best_indv().fitness(),
            "Evolution finished"
        );
        Ok(())
    }

    /// Builds the next generation without touching the current one.
    fn breed<R: Rng>(&self, config: &EvolveConfig, rng: &mut R) -> Result<Vec<Individual<P::Gene>>> {
        let size = self.individuals.len();
        let upcoming = self.generation + 1;
        let elite = config.elitism.then(|| self.best_indv().clone());

        let mut next = Vec::with_capacity(size);
        while next.len() < size {
            let (i1, i2) = self.draw_parents(config.selection, rng)?;
            let (parent1, parent2) = (&self.individuals[i1], &self.individuals[i2]);

            let (mut offspring1, mut offspring2) = if rng.random_bool(config.crossover_probability) {
                config.crossover.crossover(self.problem, parent1, parent2, rng)?
            } else {
                (parent1.clone(), parent2.clone())
            };

            if rng.random_bool(config.mutation_probability) {
                offspring1 = config.mutation.mutate(self.problem, &offspring1, rng)?;
            }
            if rng.random_bool(config.mutation_probability) {
                offspring2 = config.mutation.mutate(self.problem, &offspring2, rng)?;
            }

            next.push(offspring1.tagged(upcoming));
            if next.len() < size {
                next.push(offspring2.tagged(upcoming));
            }
        }

        if let Some(elite) = elite {
            let worst = self
                .optim
                .worst_index(next.iter().map(Individual::fitness))
                .unwrap_or(0);
            if self.optim.is_better(elite.fitness(), next[worst].fitness()) {
                tracing::trace!(
                    elite = elite.fitness(),
                    replaced = next[worst].fitness(),
                    "Elite replaces worst"
                );
                next.remove(worst);
                next.push(elite);
            }
        }

        Ok(next)
    }

    fn draw_parents<R: Rng>(&self, selection: Selection, rng: &mut R) -> Result<(usize, usize)> {
        let first = selection.select(&self.individuals, self.optim, rng)?;
        for _ in 0..MAX_PARENT_REDRAWS {
            let second = selection.select(&self.individuals, self.optim, rng)?;
            if second != first {
                return Ok((first, second));
            }
        }
        Err(Error::degenerate(format!(
            "selection returned member {first} for both parents {MAX_PARENT_REDRAWS} times"
        )))
    }
}

impl<P: Problem + ?Sized> Clone for Population<'_, P> {
    fn clone(&self) -> Self {
        Self {
            problem: self.problem,
            optim: self.optim,
            individuals: self.individuals.clone(),
            generation: self.generation,
            history: self.history.clone(),
        }
    }
}

impl<P: Problem + ?Sized> std::fmt::Debug for Population<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("optim", &self.optim)
            .field("size", &self.individuals.len())
            .field("generation", &self.generation)
            .field("best_fitness", &self.best_indv().fitness())
            .finish()
    }
}
