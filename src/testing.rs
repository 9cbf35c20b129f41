//! Problem fixtures shared by the unit tests.

use crate::error::{Error, Result};
use crate::individual::Problem;

/// Maximize the number of set bits.
pub(crate) struct OneMax;

impl Problem for OneMax {
    type Gene = u8;

    fn fitness(&self, bits: &[u8]) -> Result<f64> {
        Ok(bits.iter().map(|&b| b as f64).sum())
    }

    fn neighbours(&self, bits: &[u8]) -> Result<Vec<Vec<u8>>> {
        Ok((0..bits.len())
            .map(|i| {
                let mut n = bits.to_vec();
                n[i] = 1 - n[i].min(1);
                n
            })
            .collect())
    }
}

/// N-Queens, one queen per row: fitness is the number of non-attacking
/// pairs, so `n * (n - 1) / 2` is a solution.
pub(crate) struct NQueens {
    pub n: usize,
}

impl NQueens {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn max_fitness(&self) -> f64 {
        (self.n * (self.n - 1) / 2) as f64
    }
}

impl Problem for NQueens {
    type Gene = usize;

    fn fitness(&self, board: &[usize]) -> Result<f64> {
        if board.len() != self.n {
            return Err(Error::domain(format!(
                "board has {} rows, expected {}",
                board.len(),
                self.n
            )));
        }
        if let Some(col) = board.iter().find(|&&c| c >= self.n) {
            return Err(Error::domain(format!("column {col} off the board")));
        }
        let mut collisions = 0usize;
        for i in 0..self.n {
            for j in i + 1..self.n {
                if board[i] == board[j] || board[i].abs_diff(board[j]) == j - i {
                    collisions += 1;
                }
            }
        }
        Ok(self.max_fitness() - collisions as f64)
    }

    fn neighbours(&self, board: &[usize]) -> Result<Vec<Vec<usize>>> {
        let mut out = Vec::with_capacity(self.n * self.n.saturating_sub(1));
        for row in 0..board.len() {
            for col in 0..self.n {
                if col != board[row] {
                    let mut n = board.to_vec();
                    n[row] = col;
                    out.push(n);
                }
            }
        }
        Ok(out)
    }
}

/// Minimize `sum(x_i^2)`.
pub(crate) struct Sphere;

impl Problem for Sphere {
    type Gene = f64;

    fn fitness(&self, x: &[f64]) -> Result<f64> {
        Ok(x.iter().map(|v| v * v).sum())
    }
}

/// Fitness is the gene value itself; handy for selection tests.
pub(crate) struct Identity;

impl Problem for Identity {
    type Gene = f64;

    fn fitness(&self, x: &[f64]) -> Result<f64> {
        x.first()
            .copied()
            .ok_or_else(|| Error::domain("empty representation"))
    }
}

pub(crate) fn is_permutation_of<G: PartialEq>(candidate: &[G], values: &[G]) -> bool {
    candidate.len() == values.len()
        && values.iter().all(|v| candidate.iter().filter(|&c| c == v).count() == 1)
}
