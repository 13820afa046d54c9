//! Error types for the holtwinters-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while configuring, fitting or predicting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// A model configuration field holds a value outside its allowed set.
    #[error("{field} parameter is not valid: {value:?}")]
    InvalidConfig { field: &'static str, value: String },

    /// The model only accepts series with a single value column.
    #[error("only univariate time series are supported, got {dimensions} value columns")]
    UnivariateRequired { dimensions: usize },

    /// Model has not been fitted yet.
    #[error("call fit before predict")]
    FitRequired,

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Frequency inference or parsing failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}
