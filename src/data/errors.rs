use std::io;

/// Result alias for data-layer operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while loading or validating long-format score data.
///
/// Column-level problems (`MissingColumn`, length mismatches) are fatal
/// configuration errors: they abort before any condition is processed.
/// Row-level problems carry the offending row for diagnostics.
#[derive(Debug)]
pub enum DataError {
    /// A required column is missing from the input header.
    MissingColumn {
        column: &'static str,
    },
    /// Parallel column vectors have inconsistent lengths.
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A scale score failed to parse or is non-finite.
    InvalidScore {
        row: usize,
        value: f64,
    },
    /// A field failed to parse into its expected type.
    ParseField {
        row: usize,
        column: &'static str,
        text: String,
    },
    /// Underlying CSV reader error.
    Csv {
        text: String,
    },
    /// Underlying I/O error.
    Io {
        text: String,
    },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::MissingColumn { column } => {
                write!(f, "Required column '{column}' is missing from the input")
            }
            DataError::ColumnLengthMismatch { column, expected, actual } => {
                write!(f, "Column '{column}' has length {actual}, expected {expected}")
            }
            DataError::InvalidScore { row, value } => {
                write!(f, "Invalid scale score at row {row}: {value}, must be finite")
            }
            DataError::ParseField { row, column, text } => {
                write!(f, "Could not parse '{text}' in column '{column}' at row {row}")
            }
            DataError::Csv { text } => {
                write!(f, "CSV error: {text}")
            }
            DataError::Io { text } => {
                write!(f, "I/O error: {text}")
            }
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv { text: err.to_string() }
    }
}

impl From<io::Error> for DataError {
    fn from(err: io::Error) -> Self {
        DataError::Io { text: err.to_string() }
    }
}
