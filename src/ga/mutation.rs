//! Mutation operators.
//!
//! All operators copy the input and return a new representation;
//! [`Mutation::mutate`] re-evaluates it into a new [`Individual`].

use crate::error::{Error, Result};
use crate::individual::{Gene, Individual, Problem};
use rand::seq::index;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Mutation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Flip one binary gene.
    BinaryFlip,
    /// Exchange two positions.
    #[default]
    Swap,
    /// Reverse a segment.
    Inversion,
    /// Overwrite every position with the value found at a random position.
    ///
    /// Values may be duplicated, so this operator does not keep
    /// permutations valid.
    RandomReposition,
}

impl Mutation {
    /// Perturbs a representation, returning a new one.
    pub fn perturb<G: Gene, R: Rng>(&self, representation: &[G], rng: &mut R) -> Result<Vec<G>> {
        match self {
            Mutation::BinaryFlip => binary_flip_mutation(representation, rng),
            Mutation::Swap => Ok(swap_mutation(representation, rng)),
            Mutation::Inversion => Ok(inversion_mutation(representation, rng)),
            Mutation::RandomReposition => Ok(random_position_mutation(representation, rng)),
        }
    }

    /// Mutates an individual into a freshly evaluated one.
    pub fn mutate<P: Problem + ?Sized, R: Rng>(
        &self,
        problem: &P,
        individual: &Individual<P::Gene>,
        rng: &mut R,
    ) -> Result<Individual<P::Gene>> {
        let representation = self.perturb(individual.representation(), rng)?;
        Individual::new(problem, representation)
    }

    /// Whether a permutation stays a permutation.
    pub fn preserves_permutations(&self) -> bool {
        matches!(self, Mutation::Swap | Mutation::Inversion)
    }
}

impl FromStr for Mutation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "binary_flip" | "binary_mutation" | "bit_flip" => Ok(Mutation::BinaryFlip),
            "swap" | "swap_mutation" => Ok(Mutation::Swap),
            "inversion" | "inversion_mutation" | "invert" => Ok(Mutation::Inversion),
            "random_reposition" | "random_position" | "random_position_mutation" => {
                Ok(Mutation::RandomReposition)
            }
            other => Err(Error::config(format!("unknown mutation '{other}'"))),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mutation::BinaryFlip => "binary_flip",
            Mutation::Swap => "swap",
            Mutation::Inversion => "inversion",
            Mutation::RandomReposition => "random_reposition",
        })
    }
}

// ============================================================================
// Binary flip
// ============================================================================

/// Flips one uniformly chosen position between 0 and 1.
///
/// # Errors
/// [`Error::Domain`] on an empty representation or when the chosen gene
/// is not binary.
pub fn binary_flip_mutation<G: Gene, R: Rng>(representation: &[G], rng: &mut R) -> Result<Vec<G>> {
    if representation.is_empty() {
        return Err(Error::domain("cannot flip a gene of an empty representation"));
    }
    let position = rng.random_range(0..representation.len());
    binary_flip_at(representation, position)
}

pub fn binary_flip_at<G: Gene>(representation: &[G], position: usize) -> Result<Vec<G>> {
    let gene = representation.get(position).ok_or_else(|| {
        Error::domain(format!(
            "position {position} out of range for length {}",
            representation.len()
        ))
    })?;
    let flipped = gene
        .flipped()
        .ok_or_else(|| Error::domain(format!("gene {gene:?} at {position} is not binary")))?;
    let mut mutant = representation.to_vec();
    mutant[position] = flipped;
    Ok(mutant)
}

// ============================================================================
// Permutation-preserving
// ============================================================================

/// Swap mutation: exchange two distinct random positions.
///
/// Representations shorter than 2 come back unchanged.
///
/// # Complexity
/// O(n) for the copy
pub fn swap_mutation<G: Gene, R: Rng>(representation: &[G], rng: &mut R) -> Vec<G> {
    match distinct_pair(representation.len(), rng) {
        Some((a, b)) => swap_at(representation, a, b),
        None => representation.to_vec(),
    }
}

/// Copy of `representation` with positions `a` and `b` exchanged.
///
/// # Panics
/// Panics if either position is out of range.
pub fn swap_at<G: Clone>(representation: &[G], a: usize, b: usize) -> Vec<G> {
    let mut mutant = representation.to_vec();
    mutant.swap(a, b);
    mutant
}

/// Inversion mutation: reverse `[lo, hi)` for two distinct random positions.
///
/// Representations shorter than 2 come back unchanged.
pub fn inversion_mutation<G: Gene, R: Rng>(representation: &[G], rng: &mut R) -> Vec<G> {
    match distinct_pair(representation.len(), rng) {
        Some((a, b)) => invert_range(representation, a.min(b), a.max(b)),
        None => representation.to_vec(),
    }
}

/// Copy of `representation` with `[lo, hi)` reversed.
///
/// # Panics
/// Panics if `lo > hi` or `hi` is past the end.
pub fn invert_range<G: Clone>(representation: &[G], lo: usize, hi: usize) -> Vec<G> {
    let mut mutant = representation.to_vec();
    mutant[lo..hi].reverse();
    mutant
}

// ============================================================================
// Random reposition
// ============================================================================

/// For each position in order, overwrite it with the value currently at
/// a freshly drawn random position.
///
/// Later positions can copy values written earlier in the same pass.
pub fn random_position_mutation<G: Gene, R: Rng>(representation: &[G], rng: &mut R) -> Vec<G> {
    let mut mutant = representation.to_vec();
    let n = mutant.len();
    for i in 0..n {
        let j = rng.random_range(0..n);
        mutant[i] = mutant[j].clone();
    }
    mutant
}

fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> Option<(usize, usize)> {
    if n < 2 {
        return None;
    }
    let picks = index::sample(rng, n, 2);
    Some((picks.index(0), picks.index(1)))
}

// ============================================================================
// Tests
// ============================================================================
