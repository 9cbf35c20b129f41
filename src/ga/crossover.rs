//! Crossover operators.
//!
//! Each operator takes two parent representations and returns two new
//! ones; [`Crossover::crossover`] wraps them as evaluated
//! [`Individual`]s.
//!
//! | operator | keeps permutations valid | needs numeric genes |
//! |----------|--------------------------|---------------------|
//! | [`single_point_crossover`] | no | no |
//! | [`cycle_crossover`] (CX) | yes | no |
//! | [`pmx_crossover`] (PMX) | yes | no |
//! | [`arithmetic_crossover`] | no | yes |
//!
//! # References
//!
//! - Oliver, Smith & Holland (1987), "A Study of Permutation Crossover
//!   Operators on the Traveling Salesman Problem" (CX)
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman
//!   Problem" (PMX)
//! - Michalewicz (1996), *Genetic Algorithms + Data Structures = Evolution
//!   Programs* (arithmetic crossover)

use crate::error::{Error, Result};
use crate::individual::{Gene, Individual, Problem};
use rand::seq::index;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Crossover operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// One cut point; prefix from one parent, suffix from the other.
    #[default]
    SinglePoint,
    /// Cycle crossover (permutation-preserving).
    Cycle,
    /// Partially matched crossover (permutation-preserving).
    PartiallyMatched,
    /// Weighted blend of numeric genes.
    Arithmetic,
}

impl Crossover {
    /// Recombines two representations.
    pub fn recombine<G: Gene, R: Rng>(
        &self,
        parent1: &[G],
        parent2: &[G],
        rng: &mut R,
    ) -> Result<(Vec<G>, Vec<G>)> {
        match self {
            Crossover::SinglePoint => single_point_crossover(parent1, parent2, rng),
            Crossover::Cycle => cycle_crossover(parent1, parent2),
            Crossover::PartiallyMatched => pmx_crossover(parent1, parent2, rng),
            Crossover::Arithmetic => arithmetic_crossover(parent1, parent2, rng),
        }
    }

    /// Recombines two individuals into two freshly evaluated offspring.
    pub fn crossover<P: Problem + ?Sized, R: Rng>(
        &self,
        problem: &P,
        parent1: &Individual<P::Gene>,
        parent2: &Individual<P::Gene>,
        rng: &mut R,
    ) -> Result<(Individual<P::Gene>, Individual<P::Gene>)> {
        let (c1, c2) = self.recombine(parent1.representation(), parent2.representation(), rng)?;
        Ok((Individual::new(problem, c1)?, Individual::new(problem, c2)?))
    }

    /// Whether offspring of two permutations are permutations again.
    pub fn preserves_permutations(&self) -> bool {
        matches!(self, Crossover::Cycle | Crossover::PartiallyMatched)
    }
}

impl FromStr for Crossover {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single_point" | "single_point_co" | "spx" => Ok(Crossover::SinglePoint),
            "cycle" | "cycle_xo" | "cx" => Ok(Crossover::Cycle),
            "pmx" | "partially_matched" => Ok(Crossover::PartiallyMatched),
            "arithmetic" | "arithmetic_xo" | "geometric" => Ok(Crossover::Arithmetic),
            other => Err(Error::config(format!("unknown crossover '{other}'"))),
        }
    }
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Crossover::SinglePoint => "single_point",
            Crossover::Cycle => "cycle",
            Crossover::PartiallyMatched => "pmx",
            Crossover::Arithmetic => "arithmetic",
        })
    }
}

fn ensure_same_length<G>(parent1: &[G], parent2: &[G]) -> Result<()> {
    if parent1.len() != parent2.len() {
        return Err(Error::domain(format!(
            "parents must have equal length ({} vs {})",
            parent1.len(),
            parent2.len()
        )));
    }
    Ok(())
}

/// Both parents must hold the same distinct values.
fn ensure_permutation_pair<G: Gene>(parent1: &[G], parent2: &[G]) -> Result<()> {
    ensure_same_length(parent1, parent2)?;
    for (i, v) in parent1.iter().enumerate() {
        if parent1[i + 1..].contains(v) {
            return Err(Error::domain(format!("parent contains {v:?} twice")));
        }
        if !parent2.contains(v) {
            return Err(Error::domain(format!(
                "parents are not permutations of the same values ({v:?} missing)"
            )));
        }
    }
    Ok(())
}

fn position_of<G: PartialEq + fmt::Debug>(values: &[G], value: &G) -> Result<usize> {
    values
        .iter()
        .position(|v| v == value)
        .ok_or_else(|| Error::domain(format!("{value:?} not found in parent")))
}

// ============================================================================
// Single point
// ============================================================================

/// Single-point crossover with a cut drawn from `[1, len - 2]`.
///
/// Both offspring get a non-empty slice of each parent. Length-2 parents
/// always cut at 1.
///
/// # Errors
/// [`Error::Domain`] if the parents differ in length or are shorter than 2.
pub fn single_point_crossover<G: Gene, R: Rng>(
    parent1: &[G],
    parent2: &[G],
    rng: &mut R,
) -> Result<(Vec<G>, Vec<G>)> {
    ensure_same_length(parent1, parent2)?;
    let n = parent1.len();
    if n < 2 {
        return Err(Error::domain(
            "single-point crossover needs representations of length >= 2",
        ));
    }
    let point = rng.random_range(1..=(n - 2).max(1));
    single_point_crossover_at(parent1, parent2, point)
}

/// Single-point crossover at a fixed cut: `parent1[..point] + parent2[point..]`
/// and the complement.
pub fn single_point_crossover_at<G: Gene>(
    parent1: &[G],
    parent2: &[G],
    point: usize,
) -> Result<(Vec<G>, Vec<G>)> {
    ensure_same_length(parent1, parent2)?;
    if point > parent1.len() {
        return Err(Error::domain(format!(
            "cut point {point} beyond length {}",
            parent1.len()
        )));
    }
    let mut child1 = Vec::with_capacity(parent1.len());
    child1.extend_from_slice(&parent1[..point]);
    child1.extend_from_slice(&parent2[point..]);

    let mut child2 = Vec::with_capacity(parent1.len());
    child2.extend_from_slice(&parent2[..point]);
    child2.extend_from_slice(&parent1[point..]);

    Ok((child1, child2))
}

// ============================================================================
// Cycle crossover
// ============================================================================

/// Cycle crossover (CX).
///
/// # Algorithm
///
/// 1. Starting at position 0, follow `i → position in parent1 of parent2[i]`
///    until the chain returns to the start. These positions form a cycle.
/// 2. Positions on the cycle are copied straight: child1 from parent1,
///    child2 from parent2.
/// 3. Every other position is copied swapped: child1 from parent2, child2
///    from parent1.
///
/// A cycle is closed under the value mapping, so both children are
/// permutations of the parents' values. Swapping the arguments swaps the
/// children.
///
/// # Complexity
/// O(n²) (value lookups are linear scans)
///
/// # Errors
/// [`Error::Domain`] unless both parents are permutations of the same values.
pub fn cycle_crossover<G: Gene>(parent1: &[G], parent2: &[G]) -> Result<(Vec<G>, Vec<G>)> {
    ensure_permutation_pair(parent1, parent2)?;
    let n = parent1.len();
    if n == 0 {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut on_cycle = vec![false; n];
    let mut pos = 0;
    while !on_cycle[pos] {
        on_cycle[pos] = true;
        pos = position_of(parent1, &parent2[pos])?;
    }

    let mut child1 = Vec::with_capacity(n);
    let mut child2 = Vec::with_capacity(n);
    for i in 0..n {
        if on_cycle[i] {
            child1.push(parent1[i].clone());
            child2.push(parent2[i].clone());
        } else {
            child1.push(parent2[i].clone());
            child2.push(parent1[i].clone());
        }
    }
    Ok((child1, child2))
}

// ============================================================================
// PMX
// ============================================================================

/// Partially Matched Crossover (PMX) with random cut points.
///
/// Draws two distinct cut points from `0..=n`, giving a non-empty segment
/// `[lo, hi)`, then applies [`pmx_crossover_at`].
///
/// # Errors
/// [`Error::Domain`] unless both parents are permutations of the same values.
pub fn pmx_crossover<G: Gene, R: Rng>(
    parent1: &[G],
    parent2: &[G],
    rng: &mut R,
) -> Result<(Vec<G>, Vec<G>)> {
    ensure_permutation_pair(parent1, parent2)?;
    let n = parent1.len();
    if n < 2 {
        return Ok((parent1.to_vec(), parent2.to_vec()));
    }
    let cuts = index::sample(rng, n + 1, 2);
    let (a, b) = (cuts.index(0), cuts.index(1));
    pmx_crossover_at(parent1, parent2, a.min(b), a.max(b))
}

/// PMX over the segment `[lo, hi)`.
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// For child1 (template = parent1, donor = parent2; child2 mirrors it):
///
/// 1. Copy the template's segment into the child
/// 2. For each donor value in the segment that the child lacks, follow the
///    mapping template[i] → its position in the donor until that position
///    falls outside the segment, and place the value there
/// 3. Fill every remaining position from the donor
///
/// # Errors
/// [`Error::Domain`] for an invalid segment or non-permutation parents.
pub fn pmx_crossover_at<G: Gene>(
    parent1: &[G],
    parent2: &[G],
    lo: usize,
    hi: usize,
) -> Result<(Vec<G>, Vec<G>)> {
    ensure_permutation_pair(parent1, parent2)?;
    if lo > hi || hi > parent1.len() {
        return Err(Error::domain(format!(
            "invalid PMX segment [{lo}, {hi}) for length {}",
            parent1.len()
        )));
    }
    let child1 = pmx_build_child(parent1, parent2, lo, hi)?;
    let child2 = pmx_build_child(parent2, parent1, lo, hi)?;
    Ok((child1, child2))
}

/// Build one PMX child: segment from `template`, the rest mapped from `donor`.
fn pmx_build_child<G: Gene>(template: &[G], donor: &[G], lo: usize, hi: usize) -> Result<Vec<G>> {
    let n = template.len();
    let segment = &template[lo..hi];
    let mut child: Vec<Option<G>> = vec![None; n];

    for i in lo..hi {
        child[i] = Some(template[i].clone());
    }

    for i in lo..hi {
        let value = &donor[i];
        if segment.contains(value) {
            continue;
        }
        let mut pos = i;
        loop {
            let donor_pos = position_of(donor, &template[pos])?;
            if !(lo..hi).contains(&donor_pos) {
                child[donor_pos] = Some(value.clone());
                break;
            }
            pos = donor_pos;
        }
    }

    Ok(child
        .into_iter()
        .zip(donor)
        .map(|(slot, d)| slot.unwrap_or_else(|| d.clone()))
        .collect())
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Arithmetic (blend) crossover with `alpha` drawn uniformly from `[0, 1]`.
///
/// # Errors
/// [`Error::Domain`] for unequal lengths or genes without a numeric view.
pub fn arithmetic_crossover<G: Gene, R: Rng>(
    parent1: &[G],
    parent2: &[G],
    rng: &mut R,
) -> Result<(Vec<G>, Vec<G>)> {
    let alpha = rng.random_range(0.0..=1.0);
    arithmetic_crossover_with(parent1, parent2, alpha)
}

/// `child1[i] = alpha·p1[i] + (1 − alpha)·p2[i]`, `child2` the complement.
///
/// Integer genes round to the nearest integer when converted back.
pub fn arithmetic_crossover_with<G: Gene>(
    parent1: &[G],
    parent2: &[G],
    alpha: f64,
) -> Result<(Vec<G>, Vec<G>)> {
    ensure_same_length(parent1, parent2)?;
    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent1.len());
    for (a, b) in parent1.iter().zip(parent2) {
        let (x, y) = match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(Error::domain(format!(
                    "arithmetic crossover needs numeric genes, got {a:?} and {b:?}"
                )))
            }
        };
        child1.push(blend::<G>(alpha * x + (1.0 - alpha) * y)?);
        child2.push(blend::<G>(alpha * y + (1.0 - alpha) * x)?);
    }
    Ok((child1, child2))
}

fn blend<G: Gene>(value: f64) -> Result<G> {
    G::from_f64(value)
        .ok_or_else(|| Error::domain(format!("blended value {value} is not a valid gene")))
}

// ============================================================================
// Tests
// ============================================================================
