//! Loading trained models from JSON artifacts

use crate::error::{ForecastError, Result};
use crate::models::{Feature, FeatureRow, LinearModel, SalesModel, TreeEnsemble};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// A delivered model artifact
///
/// ```json
/// { "kind": "linear",
///   "features": ["day_of_week", "sales_lag1"],
///   "coefficients": [12.5, 0.8],
///   "intercept": 40.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Parse and validate an artifact from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let artifact: Self = serde_json::from_str(json).map_err(|e| {
            ForecastError::ModelUnavailable(format!("invalid model artifact: {}", e))
        })?;

        artifact
            .validate()
            .map_err(|e| ForecastError::ModelUnavailable(e.to_string()))?;

        Ok(artifact)
    }

    /// Serialize the artifact back to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the wrapped model's parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::TreeEnsemble(model) => model.validate(),
        }
    }

    /// Features the model was trained on, in column order
    pub fn features(&self) -> &[Feature] {
        match self {
            ModelArtifact::Linear(model) => model.features(),
            ModelArtifact::TreeEnsemble(model) => model.features(),
        }
    }
}

impl SalesModel for ModelArtifact {
    fn predict(&self, row: &FeatureRow) -> Result<f64> {
        match self {
            ModelArtifact::Linear(model) => model.predict(row),
            ModelArtifact::TreeEnsemble(model) => model.predict(row),
        }
    }

    fn name(&self) -> &str {
        match self {
            ModelArtifact::Linear(model) => model.name(),
            ModelArtifact::TreeEnsemble(model) => model.name(),
        }
    }
}

/// Load a model artifact once at startup
///
/// Any failure is reported as [`ForecastError::ModelUnavailable`].
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| {
        ForecastError::ModelUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;

    let artifact = ModelArtifact::from_json_str(&json)?;
    info!(
        path = %path.display(),
        model = artifact.name(),
        features = artifact.features().len(),
        "loaded sales model"
    );

    Ok(artifact)
}
