/// Result alias for selection aggregation.
pub type SelectResult<T> = Result<T, SelectError>;

/// Errors raised while aggregating fit records into a selection decision.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectError {
    /// No records were supplied.
    NoRecords,
    /// Every record was rejected (non-finite AIC), leaving nothing to rank.
    NoUsableRecords,
}

impl std::error::Error for SelectError {}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::NoRecords => write!(f, "No fit records to aggregate"),
            SelectError::NoUsableRecords => {
                write!(f, "All fit records carry non-finite AIC, nothing to rank")
            }
        }
    }
}
