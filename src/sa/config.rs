//! SA configuration.

use crate::error::{Error, Result};

/// Configuration for the Simulated Annealing algorithm.
///
/// Cooling is geometric: after every chain of `chain_length` moves the
/// temperature is multiplied by `alpha`, and the search stops once it is
/// no longer above `threshold`. The number of temperature steps is
/// therefore fixed by the configuration alone (see
/// [`temperature_steps`](Self::temperature_steps)).
///
/// # Examples
///
/// ```
/// use charles::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_threshold(0.001)
///     .with_alpha(0.98)
///     .with_chain_length(200);
/// assert!(config.validate().is_ok());
/// assert_eq!(SaConfig::default().temperature_steps(), 104);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Moves tried at each temperature (`L`).
    pub chain_length: usize,

    /// Starting temperature (`c`). Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling.
    pub alpha: f64,

    /// The search stops when the temperature drops to this value.
    pub threshold: f64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            chain_length: 20,
            initial_temperature: 10.0,
            alpha: 0.95,
            threshold: 0.05,
        }
    }
}

impl SaConfig {
    pub fn with_chain_length(mut self, n: usize) -> Self {
        self.chain_length = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_threshold(mut self, t: f64) -> Self {
        self.threshold = t;
        self
    }

    /// Number of chains run before the temperature reaches the threshold:
    /// `ceil(ln(threshold / initial_temperature) / ln(alpha))`.
    ///
    /// Counted by repeated multiplication, the same way the runner cools.
    /// Zero for an invalid configuration.
    pub fn temperature_steps(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        let mut steps = 0;
        let mut temperature = self.initial_temperature;
        while temperature > self.threshold {
            temperature *= self.alpha;
            steps += 1;
        }
        steps
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.chain_length == 0 {
            return Err(Error::config("chain_length must be at least 1"));
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(Error::config("initial_temperature must be positive"));
        }
        if self.threshold.is_nan() || self.threshold <= 0.0 {
            return Err(Error::config("threshold must be positive"));
        }
        if self.threshold >= self.initial_temperature {
            return Err(Error::config(
                "threshold must be less than initial_temperature",
            ));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(Error::config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SaConfig::default();
        assert_eq!(config.chain_length, 20);
        assert!((config.initial_temperature - 10.0).abs() < 1e-10);
        assert!((config.alpha - 0.95).abs() < 1e-10);
        assert!((config.threshold - 0.05).abs() < 1e-10);
    }

    #[test]
    fn test_validate_ok() {
        assert!(SaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = SaConfig::default().with_initial_temperature(-1.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_threshold_ge_initial() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_threshold(20.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_bad_alpha() {
        assert!(SaConfig::default().with_alpha(1.5).validate().is_err());
        assert!(SaConfig::default().with_alpha(1.0).validate().is_err());
        assert!(SaConfig::default().with_alpha(0.0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_chain() {
        let config = SaConfig::default().with_chain_length(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_temperature_steps_matches_closed_form() {
        let config = SaConfig::default();
        let expected = ((config.threshold / config.initial_temperature).ln() / config.alpha.ln()).ceil();
        assert_eq!(config.temperature_steps(), expected as usize);
        assert_eq!(config.temperature_steps(), 104);

        let config = SaConfig::default().with_initial_temperature(1.0).with_alpha(0.5).with_threshold(0.1);
        // 1.0, 0.5, 0.25, 0.125 are above 0.1
        assert_eq!(config.temperature_steps(), 4);
    }
}
