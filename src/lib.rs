//! Metaheuristic optimization toolkit.
//!
//! Optimizes any problem whose candidate solutions are fixed-length
//! sequences of values, given a fitness function (and, for local search,
//! a neighbourhood) supplied through the [`Problem`] trait:
//!
//! - **Genetic Algorithm (GA)**: a [`ga::Population`] evolved with
//!   pluggable selection, crossover and mutation operators and optional
//!   elitism.
//! - **Hill Climbing**: steepest-ascent local search with plateau moves.
//! - **Simulated Annealing (SA)**: geometric cooling with Metropolis
//!   acceptance.
//!
//! Every fitness comparison goes through [`Optim`], so the same problem
//! can be maximized or minimized.
//!
//! # Example
//!
//! ```
//! use charles::ga::{Crossover, EvolveConfig, Mutation, Population};
//! use charles::random::create_rng;
//! use charles::{Encoding, Optim, Problem, Result};
//!
//! /// Place n queens, one per row; fitness counts non-attacking pairs.
//! struct Queens(usize);
//!
//! impl Problem for Queens {
//!     type Gene = usize;
//!
//!     fn fitness(&self, cols: &[usize]) -> Result<f64> {
//!         let mut safe = 0;
//!         for i in 0..cols.len() {
//!             for j in i + 1..cols.len() {
//!                 if cols[i] != cols[j] && cols[i].abs_diff(cols[j]) != j - i {
//!                     safe += 1;
//!                 }
//!             }
//!         }
//!         Ok(safe as f64)
//!     }
//! }
//!
//! let mut rng = create_rng(42);
//! let problem = Queens(8);
//! let encoding = Encoding::permutation((0..8).collect());
//! let mut pop = Population::new(&problem, 40, Optim::Maximize, &encoding, &mut rng)?;
//!
//! let config = EvolveConfig::default()
//!     .with_generations(50)
//!     .with_crossover(Crossover::PartiallyMatched)
//!     .with_mutation(Mutation::Swap);
//! pop.evolve(&config, &mut rng)?;
//!
//! println!("{}", pop.best_indv());
//! # Ok::<(), charles::Error>(())
//! ```

pub mod error;
pub mod ga;
pub mod hill_climbing;
mod individual;
pub mod optim;
pub mod random;
pub mod sa;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use individual::{Encoding, Gene, Individual, Problem};
pub use optim::Optim;
