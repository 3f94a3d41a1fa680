/// Result alias for transform-layer operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors raised while fitting or evaluating marginal transforms.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The sample is empty.
    EmptySample,
    /// All sample values coincide, so no CDF can be estimated.
    DegenerateSample { value: f64 },
    /// A sample value is NaN or infinite.
    NonFiniteValue { index: usize, value: f64 },
    /// Bernstein polynomial degree must be at least 1.
    InvalidDegree { degree: usize },
    /// Kernel bandwidth must be finite and strictly positive.
    InvalidBandwidth { bandwidth: f64 },
    /// Probability argument to an inverse CDF must lie in (0, 1).
    ProbabilityOutOfRange { value: f64 },
}

impl std::error::Error for TransformError {}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::EmptySample => {
                write!(f, "Cannot fit a marginal transform to an empty sample")
            }
            TransformError::DegenerateSample { value } => {
                write!(f, "All sample values equal {value}, no spread to estimate a CDF from")
            }
            TransformError::NonFiniteValue { index, value } => {
                write!(f, "Non-finite sample value {value} at index {index}")
            }
            TransformError::InvalidDegree { degree } => {
                write!(f, "Bernstein degree must be >= 1, got {degree}")
            }
            TransformError::InvalidBandwidth { bandwidth } => {
                write!(f, "Kernel bandwidth must be finite and positive, got {bandwidth}")
            }
            TransformError::ProbabilityOutOfRange { value } => {
                write!(f, "Inverse CDF argument must lie strictly in (0, 1), got {value}")
            }
        }
    }
}
