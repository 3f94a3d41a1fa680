/// Result alias for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Errors raised while estimating parameter uncertainty by resampling.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapError {
    /// Too few pairs to resample meaningfully.
    TooFewPairs { n: usize },
    /// Replicate count must be positive.
    NoReplicates,
}

impl std::error::Error for BootstrapError {}

impl std::fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootstrapError::TooFewPairs { n } => {
                write!(f, "Need at least 2 pairs to bootstrap, got {n}")
            }
            BootstrapError::NoReplicates => {
                write!(f, "Bootstrap replicate count must be at least 1")
            }
        }
    }
}
