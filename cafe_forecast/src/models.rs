//! Trained sales models and the feature rows they consume

use crate::error::{ForecastError, Result};
use crate::forecaster::HISTORY_WINDOW;
use chrono::{Datelike, NaiveDate};
use sales_math::RollingWindow;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod artifact;
pub mod linear;
pub mod tree_ensemble;

pub use artifact::{load_model, ModelArtifact};
pub use linear::LinearModel;
pub use tree_ensemble::{RegressionTree, TreeEnsemble, TreeNode};

/// A named model input, as it appears in a model artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "day_of_week")]
    DayOfWeek,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "is_weekend")]
    IsWeekend,
    #[serde(rename = "sales_lag1")]
    SalesLag1,
    #[serde(rename = "sales_lag7")]
    SalesLag7,
    #[serde(rename = "rolling_mean_7")]
    RollingMean7,
}

impl Feature {
    /// Every feature, in the order the reference model was trained on
    pub const ALL: [Feature; 6] = [
        Feature::DayOfWeek,
        Feature::Month,
        Feature::IsWeekend,
        Feature::SalesLag1,
        Feature::SalesLag7,
        Feature::RollingMean7,
    ];

    /// Column name used by model artifacts
    pub fn name(&self) -> &'static str {
        match self {
            Feature::DayOfWeek => "day_of_week",
            Feature::Month => "month",
            Feature::IsWeekend => "is_weekend",
            Feature::SalesLag1 => "sales_lag1",
            Feature::SalesLag7 => "sales_lag7",
            Feature::RollingMean7 => "rolling_mean_7",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Model input for one forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    /// Day of week, Monday = 0
    pub day_of_week: u32,
    /// Month, 1-12
    pub month: u32,
    /// Saturday or Sunday
    pub is_weekend: bool,
    /// Most recent value in the rolling history
    pub sales_lag1: f64,
    /// Oldest value in the rolling history
    pub sales_lag7: f64,
    /// Mean of the rolling history
    pub rolling_mean_7: f64,
}

impl FeatureRow {
    /// Build the row for `target` from the current rolling history
    pub fn build(target: NaiveDate, history: &RollingWindow) -> Result<Self> {
        if history.capacity() != HISTORY_WINDOW {
            return Err(ForecastError::ValidationError(format!(
                "Rolling history must hold {} values, holds {}",
                HISTORY_WINDOW,
                history.capacity()
            )));
        }

        let day_of_week = target.weekday().num_days_from_monday();

        Ok(Self {
            day_of_week,
            month: target.month(),
            is_weekend: day_of_week >= 5,
            sales_lag1: history.lag(1)?,
            sales_lag7: history.lag(HISTORY_WINDOW)?,
            rolling_mean_7: history.mean(),
        })
    }

    /// Numeric value of a single feature
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::DayOfWeek => self.day_of_week as f64,
            Feature::Month => self.month as f64,
            Feature::IsWeekend => {
                if self.is_weekend {
                    1.0
                } else {
                    0.0
                }
            }
            Feature::SalesLag1 => self.sales_lag1,
            Feature::SalesLag7 => self.sales_lag7,
            Feature::RollingMean7 => self.rolling_mean_7,
        }
    }

    /// Values in the given feature order
    pub fn project(&self, features: &[Feature]) -> Vec<f64> {
        features.iter().map(|&f| self.value(f)).collect()
    }
}

/// A trained model that predicts one day's sales from a feature row
///
/// Implementations must be safe for concurrent read-only inference.
pub trait SalesModel: fmt::Debug + Send + Sync {
    /// Predict total sales for the row's target day
    fn predict(&self, row: &FeatureRow) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Adapts a plain function or closure into a [`SalesModel`]
pub struct PredictFn<F> {
    name: String,
    func: F,
}

impl<F> PredictFn<F>
where
    F: Fn(&FeatureRow) -> Result<f64> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for PredictFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictFn").field("name", &self.name).finish()
    }
}

impl<F> SalesModel for PredictFn<F>
where
    F: Fn(&FeatureRow) -> Result<f64> + Send + Sync,
{
    fn predict(&self, row: &FeatureRow) -> Result<f64> {
        (self.func)(row)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Reject empty or repeated feature lists
pub(crate) fn validate_features(features: &[Feature]) -> Result<()> {
    if features.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Model must use at least one feature".to_string(),
        ));
    }

    for (i, feature) in features.iter().enumerate() {
        if features[..i].contains(feature) {
            return Err(ForecastError::InvalidParameter(format!(
                "Feature '{}' is listed more than once",
                feature
            )));
        }
    }

    Ok(())
}
