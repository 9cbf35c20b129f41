//! Candidate solutions and the problem capability they are evaluated by.
//!
//! The three central items are:
//!
//! - [`Gene`]: one position of a representation (permutation index, bit,
//!   integer or real value)
//! - [`Problem`]: the caller-supplied fitness and neighbourhood functions
//! - [`Individual`]: an evaluated representation, immutable once built
//!
//! An [`Individual`] can only be obtained through [`Individual::new`] (or
//! one of the helpers that call it), so its fitness is always the fitness
//! of its current representation.

use crate::error::{Error, Result};
use rand::seq::{index, IndexedRandom, SliceRandom};
use rand::Rng;
use std::fmt;
use std::ops::Index;

/// A value that can occupy one position of a representation.
///
/// The numeric hooks are used by the operators that need them:
/// [`as_f64`](Gene::as_f64)/[`from_f64`](Gene::from_f64) by arithmetic
/// crossover, [`flipped`](Gene::flipped) by binary-flip mutation. A gene
/// type that cannot support an operation returns `None`, which the
/// operator reports as [`Error::Domain`].
///
/// Implementations exist for the primitive integers, `f32`, `f64` and
/// `bool`. Integer genes round blended values to the nearest integer.
pub trait Gene: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Numeric view of this gene.
    fn as_f64(&self) -> Option<f64>;

    /// Builds a gene from a (possibly blended) numeric value.
    fn from_f64(value: f64) -> Option<Self>;

    /// The 0↔1 complement of this gene, if it is binary.
    fn flipped(&self) -> Option<Self>;
}

macro_rules! impl_integer_gene {
    ($($t:ty),*) => {$(
        impl Gene for $t {
            fn as_f64(&self) -> Option<f64> {
                Some(*self as f64)
            }

            fn from_f64(value: f64) -> Option<Self> {
                let rounded = value.round();
                if rounded.is_finite() && rounded >= <$t>::MIN as f64 && rounded <= <$t>::MAX as f64 {
                    Some(rounded as $t)
                } else {
                    None
                }
            }

            fn flipped(&self) -> Option<Self> {
                match *self {
                    0 => Some(1),
                    1 => Some(0),
                    _ => None,
                }
            }
        }
    )*};
}

impl_integer_gene!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

macro_rules! impl_float_gene {
    ($($t:ty),*) => {$(
        impl Gene for $t {
            fn as_f64(&self) -> Option<f64> {
                Some(*self as f64)
            }

            fn from_f64(value: f64) -> Option<Self> {
                value.is_finite().then_some(value as $t)
            }

            fn flipped(&self) -> Option<Self> {
                if *self == 0.0 {
                    Some(1.0)
                } else if *self == 1.0 {
                    Some(0.0)
                } else {
                    None
                }
            }
        }
    )*};
}

impl_float_gene!(f32, f64);

impl Gene for bool {
    fn as_f64(&self) -> Option<f64> {
        Some(if *self { 1.0 } else { 0.0 })
    }

    fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then_some(value >= 0.5)
    }

    fn flipped(&self) -> Option<Self> {
        Some(!self)
    }
}

/// Defines the problem being optimized.
///
/// This is the capability every [`Individual`] is evaluated against. It
/// is passed by reference wherever individuals are built, so two problems
/// can be active in the same process without interfering.
///
/// # Implementing
///
/// ```
/// use charles::{Problem, Result};
///
/// /// Count of set bits.
/// struct OneMax;
///
/// impl Problem for OneMax {
///     type Gene = u8;
///
///     fn fitness(&self, bits: &[u8]) -> Result<f64> {
///         Ok(bits.iter().map(|&b| b as f64).sum())
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// The value type stored at each position.
    type Gene: Gene;

    /// Computes the fitness of a representation.
    ///
    /// Return [`Error::Domain`] for representations the problem cannot
    /// evaluate (wrong length, values out of range).
    fn fitness(&self, representation: &[Self::Gene]) -> Result<f64>;

    /// Returns every representation reachable by one local move.
    ///
    /// Required only by the local-search algorithms. The default reports
    /// that the problem has no neighbourhood.
    fn neighbours(&self, representation: &[Self::Gene]) -> Result<Vec<Vec<Self::Gene>>> {
        let _ = representation;
        Err(Error::domain("problem does not define a neighbourhood"))
    }
}

/// How random representations are drawn.
///
/// ```
/// use charles::Encoding;
///
/// // Eight queens, one per row, all columns distinct.
/// let queens = Encoding::permutation((0..8usize).collect());
/// assert_eq!(queens.length, 8);
/// assert!(queens.distinct);
///
/// // A 16-bit string.
/// let bits = Encoding::with_replacement(16, vec![0u8, 1]);
/// assert!(!bits.distinct);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encoding<G> {
    /// Number of positions in a representation.
    pub length: usize,
    /// Draw without replacement (no value appears twice).
    pub distinct: bool,
    /// Values a position may take.
    pub valid_set: Vec<G>,
}

impl<G: Gene> Encoding<G> {
    pub fn new(length: usize, distinct: bool, valid_set: Vec<G>) -> Self {
        Self {
            length,
            distinct,
            valid_set,
        }
    }

    /// All values of `valid_set`, each exactly once, in random order.
    pub fn permutation(valid_set: Vec<G>) -> Self {
        Self::new(valid_set.len(), true, valid_set)
    }

    /// `length` independent draws from `valid_set`.
    pub fn with_replacement(length: usize, valid_set: Vec<G>) -> Self {
        Self::new(length, false, valid_set)
    }

    /// Checks that a representation can be drawn at all.
    pub fn validate(&self) -> Result<()> {
        if self.distinct && self.length > self.valid_set.len() {
            return Err(Error::config(format!(
                "cannot draw {} distinct values from a set of {}",
                self.length,
                self.valid_set.len()
            )));
        }
        if self.valid_set.is_empty() && self.length > 0 {
            return Err(Error::config("valid_set must not be empty"));
        }
        Ok(())
    }

    /// Draws one random representation.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<Vec<G>> {
        self.validate()?;
        if self.distinct {
            let mut picks = index::sample(rng, self.valid_set.len(), self.length).into_vec();
            picks.shuffle(rng);
            Ok(picks.into_iter().map(|i| self.valid_set[i].clone()).collect())
        } else {
            (0..self.length)
                .map(|_| {
                    self.valid_set
                        .choose(rng)
                        .cloned()
                        .ok_or_else(|| Error::config("valid_set must not be empty"))
                })
                .collect()
        }
    }
}

/// One evaluated candidate solution.
///
/// Fields are private: the only way to change a representation is to
/// build a new `Individual`, which re-evaluates fitness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual<G> {
    representation: Vec<G>,
    fitness: f64,
    generation: usize,
}

impl<G: Gene> Individual<G> {
    /// Evaluates `representation` and wraps it.
    ///
    /// Fails with [`Error::Domain`] if the problem rejects the
    /// representation or returns a non-finite fitness.
    pub fn new<P>(problem: &P, representation: Vec<G>) -> Result<Self>
    where
        P: Problem<Gene = G> + ?Sized,
    {
        let fitness = problem.fitness(&representation)?;
        if !fitness.is_finite() {
            return Err(Error::domain(format!(
                "fitness function returned {fitness} for {representation:?}"
            )));
        }
        Ok(Self {
            representation,
            fitness,
            generation: 0,
        })
    }

    /// Draws a random representation from `encoding` and evaluates it.
    pub fn random<P, R>(problem: &P, encoding: &Encoding<G>, rng: &mut R) -> Result<Self>
    where
        P: Problem<Gene = G> + ?Sized,
        R: Rng,
    {
        let representation = encoding.sample(rng)?;
        Self::new(problem, representation)
    }

    /// A copy with `position` set to `value`, re-evaluated.
    pub fn with_gene<P>(&self, problem: &P, position: usize, value: G) -> Result<Self>
    where
        P: Problem<Gene = G> + ?Sized,
    {
        if position >= self.len() {
            return Err(Error::domain(format!(
                "position {position} out of range for representation of length {}",
                self.len()
            )));
        }
        let mut representation = self.representation.clone();
        representation[position] = value;
        Self::new(problem, representation)
    }

    /// Every neighbour the problem defines, each evaluated.
    pub fn neighbours<P>(&self, problem: &P) -> Result<Vec<Self>>
    where
        P: Problem<Gene = G> + ?Sized,
    {
        problem
            .neighbours(&self.representation)?
            .into_iter()
            .map(|rep| Self::new(problem, rep))
            .collect()
    }

    /// First position holding `value`.
    pub fn index_of(&self, value: &G) -> Option<usize> {
        self.representation.iter().position(|g| g == value)
    }
}

impl<G> Individual<G> {
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Generation in which this individual entered the population.
    ///
    /// Offspring and pass-through parents carry the generation they enter;
    /// an elite carried over by elitism keeps its earlier tag.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn representation(&self) -> &[G] {
        &self.representation
    }

    pub fn into_representation(self) -> Vec<G> {
        self.representation
    }

    pub fn len(&self) -> usize {
        self.representation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representation.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&G> {
        self.representation.get(position)
    }

    pub(crate) fn tagged(mut self, generation: usize) -> Self {
        self.generation = generation;
        self
    }
}

impl<G> Index<usize> for Individual<G> {
    type Output = G;

    fn index(&self, position: usize) -> &G {
        &self.representation[position]
    }
}

impl<G> fmt::Display for Individual<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Individual(size={}); Fitness: {}; Generation: {}",
            self.representation.len(),
            self.fitness,
            self.generation
        )
    }
}
