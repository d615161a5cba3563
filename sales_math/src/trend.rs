//! Trend comparison between a trailing and a leading average

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default half-width of the "stable" band, in percent
pub const DEFAULT_TREND_BAND: f64 = 5.0;

/// Relative change from `baseline` to `current`, in percent
///
/// A zero baseline has no defined relative change and is reported as
/// [`MathError::DivisionUndefined`] instead of producing infinity or NaN.
pub fn percent_change(baseline: f64, current: f64) -> Result<f64> {
    if !baseline.is_finite() || !current.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Percent change needs finite values, got baseline={} current={}",
            baseline, current
        )));
    }

    if baseline == 0.0 {
        return Err(MathError::DivisionUndefined(
            "Baseline average is zero".to_string(),
        ));
    }

    Ok((current - baseline) / baseline * 100.0)
}

/// Direction of sales relative to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Declining,
    Stable,
    Growing,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Declining => "declining",
            Trend::Stable => "stable",
            Trend::Growing => "growing",
        };
        f.write_str(label)
    }
}

/// Classifies a percent change against a symmetric band
///
/// Boundaries are exclusive: a change of exactly `+band` or `-band` is
/// still [`Trend::Stable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendClassifier {
    band: f64,
}

impl TrendClassifier {
    /// Create a classifier with the given band half-width, in percent
    pub fn new(band: f64) -> Result<Self> {
        if !band.is_finite() || band < 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Trend band must be a finite non-negative percentage, got {}",
                band
            )));
        }

        Ok(Self { band })
    }

    /// Band half-width, in percent
    pub fn band(&self) -> f64 {
        self.band
    }

    /// Classify a percent change
    pub fn classify(&self, percent: f64) -> Trend {
        if percent > self.band {
            Trend::Growing
        } else if percent < -self.band {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self {
            band: DEFAULT_TREND_BAND,
        }
    }
}
