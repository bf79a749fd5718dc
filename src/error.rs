//! Error surface of the measures-of-association engine.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Reasons a request is rejected. No partial table is ever returned.
#[derive(Debug, Error)]
pub enum AssocError {
    /// Named column absent from the frame.
    #[error("column '{column}' not found in frame")]
    MissingColumn { column: String },

    /// Outcome column does not hold exactly two distinct non-missing values.
    #[error(
        "outcome column '{column}' must have exactly two distinct non-missing values, found {found}: [{values}]"
    )]
    NotDichotomous {
        column: String,
        found: usize,
        values: String,
    },

    /// Case value or base value does not occur in its column.
    #[error("value '{value}' not found in column '{column}'")]
    ValueNotFound { column: String, value: String },

    /// A stratum needed for a comparison has no rows left.
    #[error("insufficient data for level '{level}': {message}")]
    InsufficientData { level: String, message: String },

    /// A numerical step would need ln(0), a division by zero or a negative variance.
    #[error("undefined {quantity} for level '{level}'")]
    Undefined { level: String, quantity: String },

    /// Significance level or ratio kind out of range.
    #[error("invalid configuration: {message} (got '{value}')")]
    BadConfig { message: String, value: String },

    /// Failure raised by the underlying frame container.
    #[error(transparent)]
    Frame(#[from] PolarsError),
}

impl AssocError {
    pub(crate) fn bad_config(message: impl Into<String>, value: impl ToString) -> Self {
        Self::BadConfig {
            message: message.into(),
            value: value.to_string(),
        }
    }
}
