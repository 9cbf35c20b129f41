//! Genetic Algorithm.
//!
//! A [`Population`] of [`Individual`](crate::Individual)s evolves one
//! generation at a time: parents are drawn with a [`Selection`] strategy,
//! recombined with a [`Crossover`], perturbed with a [`Mutation`], and the
//! offspring replace the previous generation. With elitism the best
//! member of each generation survives into the next.
//!
//! # Key Types
//!
//! - [`Population`]: owns the individuals and runs [`Population::evolve`]
//! - [`EvolveConfig`]: generations, operator probabilities, operator choice
//! - [`GenerationStats`]: best/worst/mean fitness per generation
//!
//! # Submodules
//!
//! - [`crossover`]: single-point, cycle (CX), PMX and arithmetic crossover
//! - [`mutation`]: binary flip, swap, inversion and random reposition
//! - [`selection`]: fitness proportionate, tournament, rank and SUS
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"

mod config;
pub mod crossover;
pub mod mutation;
mod population;
pub mod selection;

pub use config::EvolveConfig;
pub use crossover::Crossover;
pub use mutation::Mutation;
pub use population::{GenerationStats, Population, MAX_PARENT_REDRAWS};
pub use selection::{stochastic_universal_sampling, Selection};
