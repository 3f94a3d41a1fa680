/// Result alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for batch execution.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal configuration problems, caught before any unit runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// At least one candidate family is required.
    NoFamilies,
    /// Minimum pair count must leave something to fit.
    MinPairsTooSmall { min_pairs: usize },
    /// Bernstein degree must be at least 1.
    InvalidBernsteinDegree { degree: usize },
    /// Explicit kernel bandwidth must be finite and positive.
    InvalidBandwidth { bandwidth: f64 },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoFamilies => {
                write!(f, "At least one candidate copula family is required")
            }
            ConfigError::MinPairsTooSmall { min_pairs } => {
                write!(f, "Minimum pair count must be at least 10, got {min_pairs}")
            }
            ConfigError::InvalidBernsteinDegree { degree } => {
                write!(f, "Bernstein degree must be >= 1, got {degree}")
            }
            ConfigError::InvalidBandwidth { bandwidth } => {
                write!(f, "Kernel bandwidth must be finite and positive, got {bandwidth}")
            }
        }
    }
}

/// Batch-level failures.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// No (dataset, condition) units were supplied.
    NoUnits,
}

impl std::error::Error for PipelineError {}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::NoUnits => {
                write!(f, "Batch contains no (dataset, condition) units to run")
            }
        }
    }
}
