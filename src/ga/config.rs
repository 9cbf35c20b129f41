//! Evolution parameters.
//!
//! [`EvolveConfig`] holds every parameter of one [`Population::evolve`]
//! call.
//!
//! [`Population::evolve`]: super::Population::evolve

use super::crossover::Crossover;
use super::mutation::Mutation;
use super::selection::Selection;
use crate::error::{Error, Result};

/// Configuration for [`Population::evolve`](super::Population::evolve).
///
/// # Defaults
///
/// ```
/// use charles::ga::EvolveConfig;
///
/// let config = EvolveConfig::default();
/// assert_eq!(config.generations, 100);
/// assert!(config.elitism);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use charles::ga::{Crossover, EvolveConfig, Mutation, Selection};
///
/// let config = EvolveConfig::default()
///     .with_generations(50)
///     .with_selection(Selection::Tournament(4))
///     .with_crossover(Crossover::PartiallyMatched)
///     .with_mutation(Mutation::Inversion)
///     .with_mutation_probability(0.2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolveConfig {
    /// Number of generations to run.
    pub generations: usize,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, both parents pass through unchanged.
    pub crossover_probability: f64,

    /// Probability of mutating each offspring (0.0–1.0).
    pub mutation_probability: f64,

    /// Strategy for choosing parents.
    pub selection: Selection,

    pub crossover: Crossover,

    pub mutation: Mutation,

    /// Carry the best individual of each generation into the next one.
    pub elitism: bool,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            crossover_probability: 0.9,
            mutation_probability: 0.1,
            selection: Selection::default(),
            crossover: Crossover::default(),
            mutation: Mutation::default(),
            elitism: true,
        }
    }
}

impl EvolveConfig {
    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Convenience builder for setting tournament size.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`Error::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.generations == 0 {
            return Err(Error::config("generations must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(Error::config(format!(
                "crossover_probability must be in [0, 1], got {}",
                self.crossover_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(Error::config(format!(
                "mutation_probability must be in [0, 1], got {}",
                self.mutation_probability
            )));
        }
        self.selection.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvolveConfig::default();
        assert_eq!(config.generations, 100);
        assert!((config.crossover_probability - 0.9).abs() < 1e-10);
        assert!((config.mutation_probability - 0.1).abs() < 1e-10);
        assert_eq!(config.selection, Selection::Tournament(4));
        assert_eq!(config.crossover, Crossover::SinglePoint);
        assert_eq!(config.mutation, Mutation::Swap);
        assert!(config.elitism);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EvolveConfig::default()
            .with_generations(10)
            .with_selection(Selection::Rank)
            .with_crossover(Crossover::Cycle)
            .with_mutation(Mutation::Inversion)
            .with_crossover_probability(0.5)
            .with_mutation_probability(0.05)
            .with_elitism(false);

        assert_eq!(config.generations, 10);
        assert_eq!(config.selection, Selection::Rank);
        assert_eq!(config.crossover, Crossover::Cycle);
        assert_eq!(config.mutation, Mutation::Inversion);
        assert!((config.crossover_probability - 0.5).abs() < 1e-10);
        assert!((config.mutation_probability - 0.05).abs() < 1e-10);
        assert!(!config.elitism);
    }

    #[test]
    fn test_clamp_probabilities() {
        let config = EvolveConfig::default()
            .with_crossover_probability(-0.5)
            .with_mutation_probability(2.0);
        assert!((config.crossover_probability - 0.0).abs() < 1e-10);
        assert!((config.mutation_probability - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_ok() {
        assert!(EvolveConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = EvolveConfig::default().with_generations(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_probabilities_set_directly() {
        let config = EvolveConfig {
            mutation_probability: 1.5,
            ..EvolveConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = EvolveConfig {
            crossover_probability: f64::NAN,
            ..EvolveConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = EvolveConfig::default().with_tournament_size(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
