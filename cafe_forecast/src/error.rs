//! Error types for the cafe_forecast crate

use sales_math::MathError;
use thiserror::Error;

/// Custom error types for the cafe_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A transaction row that cannot be used (bad date, missing total)
    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    /// Fewer daily points than the forecaster needs
    #[error("Insufficient history: need at least {required} daily points, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// Relative change against a zero baseline
    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    /// The trained model failed on a constructed feature row
    #[error("Model inference error at step {step}: {reason}")]
    ModelInferenceError { step: usize, reason: String },

    /// The model artifact could not be loaded or validated
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Error related to data validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from configuration loading or validation
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::JsonError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DivisionUndefined(msg) => ForecastError::DivisionUndefined(msg),
            MathError::InsufficientData(msg) | MathError::InvalidInput(msg) => {
                ForecastError::ValidationError(msg)
            }
        }
    }
}
