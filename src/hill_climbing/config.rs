//! Hill climbing configuration.

use crate::error::{Error, Result};

/// Configuration for [`HillClimbRunner`](super::HillClimbRunner).
///
/// ```
/// use charles::hill_climbing::HillClimbConfig;
///
/// let config = HillClimbConfig::default().with_max_no_improvement(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillClimbConfig {
    /// Consecutive steps without a strict improvement before stopping.
    ///
    /// Sideways (equal-fitness) moves count towards this bound.
    pub max_no_improvement: usize,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            max_no_improvement: 1000,
        }
    }
}

impl HillClimbConfig {
    pub fn with_max_no_improvement(mut self, n: usize) -> Self {
        self.max_no_improvement = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_no_improvement == 0 {
            return Err(Error::config("max_no_improvement must be at least 1"));
        }
        Ok(())
    }
}
