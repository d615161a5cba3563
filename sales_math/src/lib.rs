//! # Sales Math
//!
//! Numeric building blocks for daily sales analysis.
//! This crate provides the fixed-length rolling window used to build lag
//! features, plain averages, and the trend comparison between two averages.

use statrs::statistics::Statistics;
use thiserror::Error;

pub mod rolling;
pub mod trend;

pub use rolling::RollingWindow;
pub use trend::{percent_change, Trend, TrendClassifier, DEFAULT_TREND_BAND};

/// Errors that can occur in sales calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Arithmetic mean of a slice of values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().mean())
}
