//! Error kinds shared by every operator and search loop.

/// Errors raised by operators, populations and local search.
///
/// Nothing in the crate recovers from these: an error aborts the
/// generation (or search) that produced it and is returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid operator or run parameters.
    #[error("ConfigError: {0}")]
    Config(String),

    /// A fitness, neighbour or operator capability was handed a
    /// representation it cannot work with.
    #[error("DomainError: {0}")]
    Domain(String),

    /// Input that makes an operator mathematically undefined, e.g. a
    /// roulette wheel whose total fitness is zero.
    #[error("DegenerateInputError: {0}")]
    DegenerateInput(String),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Error::Domain(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        Error::DegenerateInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_kind() {
        assert_eq!(
            Error::config("k must be positive").to_string(),
            "ConfigError: k must be positive"
        );
        assert_eq!(
            Error::domain("not binary").to_string(),
            "DomainError: not binary"
        );
        assert_eq!(
            Error::degenerate("total fitness is zero").to_string(),
            "DegenerateInputError: total fitness is zero"
        );
    }
}
