//! Random source helpers.
//!
//! Every algorithm in this crate takes a `&mut R: Rng` supplied by the
//! caller, so a whole run shares one generator. [`create_rng`] builds the
//! seeded generator used by tests, benches and reproducible runs.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from `seed`.
///
/// ```
/// use rand::Rng;
///
/// let mut a = charles::random::create_rng(7);
/// let mut b = charles::random::create_rng(7);
/// assert_eq!(a.random_range(0..1000), b.random_range(0..1000));
/// ```
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
