//! Linear regression over the forecast features

use crate::error::{ForecastError, Result};
use crate::models::{validate_features, Feature, FeatureRow, SalesModel};
use serde::{Deserialize, Serialize};

/// Linear regression model: `intercept + Σ coefficient × feature`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Features, in coefficient order
    features: Vec<Feature>,
    /// One coefficient per feature
    coefficients: Vec<f64>,
    /// Constant term
    intercept: f64,
}

impl LinearModel {
    /// Create a new linear model
    pub fn new(features: Vec<Feature>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            features,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check that the parameters describe a usable model
    pub fn validate(&self) -> Result<()> {
        validate_features(&self.features)?;

        if self.coefficients.len() != self.features.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Linear model has {} features but {} coefficients",
                self.features.len(),
                self.coefficients.len()
            )));
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "Linear model parameters must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// Features, in coefficient order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Coefficients, one per feature
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Constant term
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl SalesModel for LinearModel {
    fn predict(&self, row: &FeatureRow) -> Result<f64> {
        let prediction = self
            .features
            .iter()
            .zip(&self.coefficients)
            .map(|(&feature, coefficient)| coefficient * row.value(feature))
            .sum::<f64>()
            + self.intercept;

        Ok(prediction)
    }

    fn name(&self) -> &str {
        "linear regression"
    }
}
