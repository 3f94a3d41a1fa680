use crate::copula::errors::FitError;

/// Result alias for goodness-of-fit operations.
pub type GofResult<T> = Result<T, GofError>;

/// Errors raised while computing the Cramér–von Mises test.
#[derive(Debug)]
pub enum GofError {
    /// The observed margins are malformed or the fitted parameters are
    /// unusable for simulation/refitting.
    Fit(FitError),
    /// Margins passed alongside the fit have mismatched lengths.
    MarginLengthMismatch { u_len: usize, v_len: usize },
}

impl std::error::Error for GofError {}

impl std::fmt::Display for GofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GofError::Fit(err) => write!(f, "Goodness-of-fit inner fit failed: {err}"),
            GofError::MarginLengthMismatch { u_len, v_len } => {
                write!(f, "Margin lengths differ: u has {u_len}, v has {v_len}")
            }
        }
    }
}

impl From<FitError> for GofError {
    fn from(err: FitError) -> Self {
        GofError::Fit(err)
    }
}
