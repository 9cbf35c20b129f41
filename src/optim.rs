//! Optimization direction.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Direction in which fitness improves.
///
/// Every fitness comparison in the crate (selection, elitism, best/worst,
/// hill climbing, annealing) is routed through this type so the whole
/// run agrees on what "better" means.
///
/// ```
/// use charles::Optim;
///
/// let optim: Optim = "min".parse().unwrap();
/// assert!(optim.is_better(1.0, 2.0));
/// assert!("sideways".parse::<Optim>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Optim {
    /// Higher fitness is better.
    #[default]
    Maximize,
    /// Lower fitness is better.
    Minimize,
}

impl Optim {
    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Optim::Maximize => a > b,
            Optim::Minimize => a < b,
        }
    }

    /// Returns `true` if `a` is at least as good as `b`.
    pub fn is_not_worse(self, a: f64, b: f64) -> bool {
        match self {
            Optim::Maximize => a >= b,
            Optim::Minimize => a <= b,
        }
    }

    /// Index of the best value; ties keep the earliest. `None` when empty.
    pub fn best_index<I>(self, fitnesses: I) -> Option<usize>
    where
        I: IntoIterator<Item = f64>,
    {
        extremum(fitnesses, |a, b| self.is_better(a, b))
    }

    /// Index of the worst value; ties keep the earliest. `None` when empty.
    pub fn worst_index<I>(self, fitnesses: I) -> Option<usize>
    where
        I: IntoIterator<Item = f64>,
    {
        extremum(fitnesses, |a, b| self.is_better(b, a))
    }
}

fn extremum<I, F>(fitnesses: I, wins: F) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
    F: Fn(f64, f64) -> bool,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, f) in fitnesses.into_iter().enumerate() {
        match best {
            Some((_, current)) if !wins(f, current) => {}
            _ => best = Some((i, f)),
        }
    }
    best.map(|(i, _)| i)
}

impl FromStr for Optim {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "maximize" => Ok(Optim::Maximize),
            "min" | "minimize" => Ok(Optim::Minimize),
            other => Err(Error::config(format!(
                "unsupported optimization direction '{other}' (expected min or max)"
            ))),
        }
    }
}

impl fmt::Display for Optim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optim::Maximize => f.write_str("max"),
            Optim::Minimize => f.write_str("min"),
        }
    }
}
