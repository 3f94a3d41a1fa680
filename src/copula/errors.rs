use crate::optimization::errors::OptError;

/// Result alias for copula fitting and simulation.
pub type FitResult<T> = Result<T, FitError>;

/// Errors raised while fitting or simulating a copula family.
///
/// Convergence trouble inside the optimizer surfaces as `Optimization`;
/// `fit_all` records these per family so one stubborn family never sinks a
/// whole condition.
#[derive(Debug)]
pub enum FitError {
    /// A pseudo-observation fell outside the open unit interval.
    InvalidPseudoObservation { index: usize, value: f64 },
    /// The two margins have different lengths.
    MarginLengthMismatch { u_len: usize, v_len: usize },
    /// Fewer than two pairs, nothing to fit.
    EmptySample,
    /// A copula parameter is outside its family's domain.
    ParamOutOfDomain { family: &'static str, value: f64 },
    /// Wrong parameter vector length for the family.
    ParamLengthMismatch { family: &'static str, expected: usize, actual: usize },
    /// A statrs distribution constructor rejected its arguments.
    Distribution { text: String },
    /// The optimizer failed.
    Optimization(OptError),
    /// The log-likelihood at the optimum is not finite.
    NonFiniteLogLik { value: f64 },
}

impl std::error::Error for FitError {}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InvalidPseudoObservation { index, value } => {
                write!(f, "Pseudo-observation {value} at index {index} is outside (0, 1)")
            }
            FitError::MarginLengthMismatch { u_len, v_len } => {
                write!(f, "Margin lengths differ: u has {u_len}, v has {v_len}")
            }
            FitError::EmptySample => {
                write!(f, "Need at least two pseudo-observation pairs to fit a copula")
            }
            FitError::ParamOutOfDomain { family, value } => {
                write!(f, "Parameter {value} is outside the {family} domain")
            }
            FitError::ParamLengthMismatch { family, expected, actual } => {
                write!(f, "{family} expects {expected} parameter(s), got {actual}")
            }
            FitError::Distribution { text } => {
                write!(f, "Distribution construction failed: {text}")
            }
            FitError::Optimization(err) => {
                write!(f, "Pseudo-likelihood optimization failed: {err}")
            }
            FitError::NonFiniteLogLik { value } => {
                write!(f, "Optimized log-likelihood is not finite: {value}")
            }
        }
    }
}

impl From<OptError> for FitError {
    fn from(err: OptError) -> Self {
        FitError::Optimization(err)
    }
}
