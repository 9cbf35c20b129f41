//! Selection strategies for the GA.
//!
//! Selection determines which individuals are chosen as parents for
//! crossover. Every strategy returns indices into the slice it was given,
//! so the caller always gets back an existing member.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection
//!   Algorithm" (stochastic universal sampling)

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::optim::Optim;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use charles::ga::Selection;
///
/// let sel = Selection::Tournament(3);
/// let sel: Selection = "rank".parse().unwrap();
/// assert_eq!(sel, Selection::Rank);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Roulette wheel: probability proportional to fitness.
    ///
    /// When minimizing each individual's slice is `total - fitness`, so
    /// low fitness gets the larger slice. Requires non-negative fitness
    /// with a positive total.
    ///
    /// # Complexity
    /// O(n) per selection
    FitnessProportionate,

    /// Tournament selection: `k` uniform draws with replacement, best wins.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Rank-based selection: the worst gets weight 1, the best weight N.
    ///
    /// # Complexity
    /// O(n log n) per selection (sort)
    Rank,

    /// Stochastic universal sampling.
    ///
    /// Several parents come from one spin with evenly spaced pointers,
    /// which keeps the spread of picks close to their expected counts.
    /// See [`stochastic_universal_sampling`].
    StochasticUniversal,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(4)
    }
}

impl Selection {
    /// Select one parent index.
    pub fn select<G, R: Rng>(
        &self,
        individuals: &[Individual<G>],
        optim: Optim,
        rng: &mut R,
    ) -> Result<usize> {
        ensure_not_empty(individuals)?;
        match self {
            Selection::FitnessProportionate => fitness_proportionate(individuals, optim, rng),
            Selection::Tournament(k) => tournament(individuals, optim, *k, rng),
            Selection::Rank => rank(individuals, optim, rng),
            Selection::StochasticUniversal => {
                let picks = stochastic_universal_sampling(individuals, optim, 1, rng)?;
                Ok(picks[0])
            }
        }
    }

    /// Select `n` parent indices.
    ///
    /// Stochastic universal sampling draws all `n` from a single spin;
    /// the other strategies call [`select`](Self::select) `n` times.
    pub fn sample<G, R: Rng>(
        &self,
        individuals: &[Individual<G>],
        optim: Optim,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        match self {
            Selection::StochasticUniversal => {
                stochastic_universal_sampling(individuals, optim, n, rng)
            }
            _ => (0..n).map(|_| self.select(individuals, optim, rng)).collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Selection::Tournament(0) => Err(Error::config("tournament size must be at least 1")),
            _ => Ok(()),
        }
    }
}

impl FromStr for Selection {
    type Err = Error;

    /// Accepts `fps`, `tournament`, `tournament:<k>`, `rank` and `sus`
    /// (plus their long names).
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        if let Some(k) = name.strip_prefix("tournament:") {
            let k: usize = k
                .parse()
                .map_err(|_| Error::config(format!("invalid tournament size '{k}'")))?;
            let sel = Selection::Tournament(k);
            sel.validate()?;
            return Ok(sel);
        }
        match name.as_str() {
            "fps" | "roulette" | "fitness_proportionate" => Ok(Selection::FitnessProportionate),
            "tournament" => Ok(Selection::default()),
            "rank" | "rank_based" => Ok(Selection::Rank),
            "sus" | "stochastic_universal" => Ok(Selection::StochasticUniversal),
            other => Err(Error::config(format!("unknown selection '{other}'"))),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::FitnessProportionate => f.write_str("fps"),
            Selection::Tournament(k) => write!(f, "tournament:{k}"),
            Selection::Rank => f.write_str("rank"),
            Selection::StochasticUniversal => f.write_str("sus"),
        }
    }
}

fn ensure_not_empty<G>(individuals: &[Individual<G>]) -> Result<()> {
    if individuals.is_empty() {
        return Err(Error::config("cannot select from an empty population"));
    }
    Ok(())
}

/// Wheel slices for the proportionate strategies.
///
/// Maximizing uses raw fitness; minimizing uses `total - fitness`.
/// Fitness is divided by the largest value first, so the total stays
/// finite even when the raw sum would overflow.
fn proportional_weights<G>(individuals: &[Individual<G>], optim: Optim) -> Result<Vec<f64>> {
    if let Some(neg) = individuals.iter().find(|ind| ind.fitness() < 0.0) {
        return Err(Error::degenerate(format!(
            "fitness-proportionate selection needs non-negative fitness, got {}",
            neg.fitness()
        )));
    }
    let max = individuals
        .iter()
        .map(|ind| ind.fitness())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return Err(Error::degenerate(
            "total fitness is zero; the selection wheel is undefined",
        ));
    }
    let scaled: Vec<f64> = individuals.iter().map(|ind| ind.fitness() / max).collect();
    let total: f64 = scaled.iter().sum();
    Ok(match optim {
        Optim::Maximize => scaled,
        Optim::Minimize => scaled.into_iter().map(|f| total - f).collect(),
    })
}

/// Spin a wheel of `weights` listed in `order`; returns the original index.
fn spin<R: Rng>(order: &[usize], weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = order.iter().map(|&i| weights[i]).sum();
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for &i in order {
        cumulative += weights[i];
        if cumulative > threshold {
            return i;
        }
    }
    order[order.len() - 1] // floating-point fallback
}

fn fitness_proportionate<G, R: Rng>(
    individuals: &[Individual<G>],
    optim: Optim,
    rng: &mut R,
) -> Result<usize> {
    let n = individuals.len();
    if n == 1 {
        return Ok(0);
    }
    let weights = proportional_weights(individuals, optim)?;
    let order: Vec<usize> = (0..n).collect();
    Ok(spin(&order, &weights, rng))
}

fn tournament<G, R: Rng>(
    individuals: &[Individual<G>],
    optim: Optim,
    k: usize,
    rng: &mut R,
) -> Result<usize> {
    if k == 0 {
        return Err(Error::config("tournament size must be at least 1"));
    }
    let n = individuals.len();
    let mut best = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if optim.is_better(individuals[idx].fitness(), individuals[best].fitness()) {
            best = idx;
        }
    }
    Ok(best)
}

fn rank<G, R: Rng>(individuals: &[Individual<G>], optim: Optim, rng: &mut R) -> Result<usize> {
    let n = individuals.len();
    if n == 1 {
        return Ok(0);
    }
    // Worst first, so position i carries weight i + 1.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let (fa, fb) = (individuals[a].fitness(), individuals[b].fitness());
        match optim {
            Optim::Maximize => fa.total_cmp(&fb),
            Optim::Minimize => fb.total_cmp(&fa),
        }
    });
    let mut weights = vec![0.0; n];
    for (rank, &i) in order.iter().enumerate() {
        weights[i] = (rank + 1) as f64;
    }
    Ok(spin(&order, &weights, rng))
}

/// Stochastic universal sampling (Baker, 1987).
///
/// Individuals are ordered best first and laid out on a cumulative
/// proportion wheel. One offset is drawn in `[0, 1/num_parents)` and
/// `num_parents` pointers are placed `1/num_parents` apart from it; each
/// pointer picks the individual whose slice it lands in. The wheel index
/// only moves forward (wrapping), so the sweep is O(n + num_parents).
///
/// Slices follow the same rule as [`Selection::FitnessProportionate`].
///
/// # Errors
/// - [`Error::Config`] if `num_parents` is zero or the slice is empty
/// - [`Error::DegenerateInput`] if the total fitness is zero or any
///   fitness is negative
pub fn stochastic_universal_sampling<G, R: Rng>(
    individuals: &[Individual<G>],
    optim: Optim,
    num_parents: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if num_parents == 0 {
        return Err(Error::config("num_parents must be at least 1"));
    }
    ensure_not_empty(individuals)?;
    let n = individuals.len();
    if n == 1 {
        return Ok(vec![0; num_parents]);
    }

    let weights = proportional_weights(individuals, optim)?;
    let total: f64 = weights.iter().sum();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

    let mut cumulative = Vec::with_capacity(n);
    let mut acc = 0.0;
    for &i in &order {
        acc += weights[i] / total;
        cumulative.push(acc);
    }
    // Pointers stay below 1.0; pin the last bound so rounding cannot strand them.
    cumulative[n - 1] = 1.0;

    let step = 1.0 / num_parents as f64;
    let start = rng.random_range(0.0..step);

    let mut parents = Vec::with_capacity(num_parents);
    let mut index = 0;
    for i in 0..num_parents {
        let pointer = start + i as f64 * step;
        while pointer > cumulative[index] {
            index = (index + 1) % n;
        }
        parents.push(order[index]);
    }
    Ok(parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::testing::Identity;

    fn make_population(fitnesses: &[f64]) -> Vec<Individual<f64>> {
        fitnesses
            .iter()
            .map(|&f| Individual::new(&Identity, vec![f]).unwrap())
            .collect()
    }

    fn counts(sel: Selection, pop: &[Individual<f64>], optim: Optim, n: usize) -> Vec<u32> {
        let mut rng = create_rng(42);
        let mut counts = vec![0u32; pop.len()];
        for _ in 0..n {
            counts[sel.select(pop, optim, &mut rng).unwrap()] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_best_for_both_directions() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);

        let c = counts(Selection::Tournament(4), &pop, Optim::Minimize, 10_000);
        assert!(c[2] > 6000, "min: expected index 2 to dominate, got {c:?}");

        let c = counts(Selection::Tournament(4), &pop, Optim::Maximize, 10_000);
        assert!(c[0] > 6000, "max: expected index 0 to dominate, got {c:?}");
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let c = counts(Selection::Tournament(1), &pop, Optim::Maximize, 10_000);
        for &x in &c {
            assert!(x > 1500, "expected uniform, got counts: {c:?}");
        }
    }

    #[test]
    fn test_tournament_zero_is_config_error() {
        let pop = make_population(&[1.0, 2.0]);
        let mut rng = create_rng(42);
        assert!(matches!(
            Selection::Tournament(0).select(&pop, Optim::Maximize, &mut rng),
            Err(Error::Config(_))
        ));
        assert!(Selection::Tournament(0).validate().is_err());
    }

    #[test]
    fn test_fps_proportional_when_maximizing() {
        let pop = make_population(&[1.0, 3.0]);
        let c = counts(Selection::FitnessProportionate, &pop, Optim::Maximize, 20_000);
        let share = c[1] as f64 / 20_000.0;
        assert!((share - 0.75).abs() < 0.03, "expected ~75%, got {share}");
    }

    #[test]
    fn test_fps_inverts_when_minimizing() {
        let pop = make_population(&[100.0, 50.0, 1.0, 80.0]);
        let c = counts(Selection::FitnessProportionate, &pop, Optim::Minimize, 10_000);
        assert!(c[2] > c[0], "lowest fitness should win more: {c:?}");
        assert!(c[1] > c[0], "50 should beat 100 when minimizing: {c:?}");
    }

    #[test]
    fn test_fps_zero_total_is_degenerate() {
        let pop = make_population(&[0.0, 0.0, 0.0]);
        let mut rng = create_rng(42);
        for optim in [Optim::Maximize, Optim::Minimize] {
            assert!(matches!(
                Selection::FitnessProportionate.select(&pop, optim, &mut rng),
                Err(Error::DegenerateInput(_))
            ));
        }
    }

    #[test]
    fn test_fps_negative_fitness_is_degenerate() {
        let pop = make_population(&[-1.0, 4.0]);
        let mut rng = create_rng(42);
        assert!(matches!(
            Selection::FitnessProportionate.select(&pop, Optim::Maximize, &mut rng),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_rank_favors_best() {
        let pop = make_population(&[100.0, 50.0, 1.0, 80.0]);

        let c = counts(Selection::Rank, &pop, Optim::Minimize, 10_000);
        assert!(c[2] > c[3] && c[3] > c[0], "min: rank order violated: {c:?}");

        let c = counts(Selection::Rank, &pop, Optim::Maximize, 10_000);
        assert!(c[0] > c[3] && c[3] > c[2], "max: rank order violated: {c:?}");
    }

    #[test]
    fn test_rank_weights_are_linear() {
        // weights 1 and 2 -> best picked ~2/3 of the time
        let pop = make_population(&[0.0, 5.0]);
        let c = counts(Selection::Rank, &pop, Optim::Maximize, 30_000);
        let share = c[1] as f64 / 30_000.0;
        assert!((share - 2.0 / 3.0).abs() < 0.03, "got {share}");
    }

    #[test]
    fn test_rank_handles_zero_fitness() {
        let pop = make_population(&[0.0, 0.0, 0.0]);
        let mut rng = create_rng(42);
        let idx = Selection::Rank.select(&pop, Optim::Maximize, &mut rng).unwrap();
        assert!(idx < 3);
    }

    #[test]
    fn test_fps_and_rank_return_members_for_all_sizes() {
        let mut rng = create_rng(42);
        for n in 1..=100usize {
            let fitnesses: Vec<f64> = (0..n).map(|i| (i % 7) as f64 + 1.0).collect();
            let pop = make_population(&fitnesses);
            for optim in [Optim::Maximize, Optim::Minimize] {
                for sel in [Selection::FitnessProportionate, Selection::Rank] {
                    for _ in 0..5 {
                        let idx = sel.select(&pop, optim, &mut rng).unwrap();
                        assert!(idx < n, "{sel} returned {idx} for size {n}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = create_rng(42);
        for sel in [
            Selection::Tournament(3),
            Selection::FitnessProportionate,
            Selection::Rank,
            Selection::StochasticUniversal,
        ] {
            for optim in [Optim::Maximize, Optim::Minimize] {
                assert_eq!(sel.select(&pop, optim, &mut rng).unwrap(), 0);
            }
        }
    }

    #[test]
    fn test_empty_population_is_config_error() {
        let pop: Vec<Individual<f64>> = vec![];
        let mut rng = create_rng(42);
        assert!(matches!(
            Selection::Tournament(3).select(&pop, Optim::Maximize, &mut rng),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_sus_returns_requested_count() {
        let pop = make_population(&[4.0, 3.0, 2.0, 1.0]);
        let mut rng = create_rng(42);
        let picks = stochastic_universal_sampling(&pop, Optim::Maximize, 10, &mut rng).unwrap();
        assert_eq!(picks.len(), 10);
        assert!(picks.iter().all(|&i| i < 4));
    }

    #[test]
    fn test_sus_matches_expected_counts() {
        // Shares 0.4 / 0.3 / 0.2 / 0.1 -> with 10 pointers the counts are
        // exactly 4 / 3 / 2 / 1 whatever the offset.
        let pop = make_population(&[2.0, 4.0, 1.0, 3.0]);
        let mut rng = create_rng(3);
        for _ in 0..20 {
            let picks =
                stochastic_universal_sampling(&pop, Optim::Maximize, 10, &mut rng).unwrap();
            let mut c = [0; 4];
            for i in picks {
                c[i] += 1;
            }
            assert!((3..=5).contains(&c[1]), "{c:?}");
            assert!((2..=4).contains(&c[3]), "{c:?}");
            assert!((1..=3).contains(&c[0]), "{c:?}");
            assert!(c[2] <= 2, "{c:?}");
        }
    }

    #[test]
    fn test_sus_best_first_order() {
        let pop = make_population(&[1.0, 9.0]);
        let mut rng = create_rng(42);
        let picks = stochastic_universal_sampling(&pop, Optim::Maximize, 2, &mut rng).unwrap();
        // pointer 0 lies in [0, 0.5) which is inside the 0.9 slice of the best
        assert_eq!(picks[0], 1);
    }

    #[test]
    fn test_sus_zero_parents_is_config_error() {
        let pop = make_population(&[1.0, 2.0]);
        let mut rng = create_rng(42);
        assert!(matches!(
            stochastic_universal_sampling(&pop, Optim::Maximize, 0, &mut rng),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_sus_zero_total_is_degenerate() {
        let pop = make_population(&[0.0, 0.0]);
        let mut rng = create_rng(42);
        assert!(matches!(
            Selection::StochasticUniversal.sample(&pop, Optim::Maximize, 2, &mut rng),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_proportionate_wheels_survive_overflowing_total() {
        // 1e308 + 1e308 overflows f64
        let pop = make_population(&[1e308, 1e308, 1.0]);
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let i = Selection::FitnessProportionate
                .select(&pop, Optim::Maximize, &mut rng)
                .unwrap();
            assert!(i < 2, "picked {i}");
            let i = Selection::FitnessProportionate
                .select(&pop, Optim::Minimize, &mut rng)
                .unwrap();
            assert!(i < 3);
        }
        let picks = stochastic_universal_sampling(&pop, Optim::Maximize, 4, &mut rng).unwrap();
        assert!(picks.iter().all(|&i| i < 2), "{picks:?}");
    }

    #[test]
    fn test_sample_non_sus_draws_n() {
        let pop = make_population(&[1.0, 2.0, 3.0]);
        let mut rng = create_rng(42);
        let picks = Selection::Rank
            .sample(&pop, Optim::Maximize, 5, &mut rng)
            .unwrap();
        assert_eq!(picks.len(), 5);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("fps".parse::<Selection>().unwrap(), Selection::FitnessProportionate);
        assert_eq!("tournament".parse::<Selection>().unwrap(), Selection::Tournament(4));
        assert_eq!("tournament:7".parse::<Selection>().unwrap(), Selection::Tournament(7));
        assert_eq!("SUS".parse::<Selection>().unwrap(), Selection::StochasticUniversal);
        assert!("tournament:0".parse::<Selection>().is_err());
        assert!("tournament:x".parse::<Selection>().is_err());
        assert!("lottery".parse::<Selection>().is_err());
        for sel in [
            Selection::FitnessProportionate,
            Selection::Tournament(2),
            Selection::Rank,
            Selection::StochasticUniversal,
        ] {
            assert_eq!(sel.to_string().parse::<Selection>().unwrap(), sel);
        }
    }
}
