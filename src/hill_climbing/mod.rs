//! Hill Climbing.
//!
//! Steepest-ascent local search with sideways moves: the climber always
//! moves to the best neighbour unless that neighbour is worse, and
//! tolerates a bounded run of moves without improvement so it can cross
//! plateaus. Neighbours come from [`Problem::neighbours`](crate::Problem::neighbours).
//!
//! # References
//!
//! - Russell & Norvig (2010), *Artificial Intelligence: A Modern Approach*, §4.1.1

mod config;
mod runner;

pub use config::HillClimbConfig;
pub use runner::{hill_climb, HillClimbResult, HillClimbRunner};
