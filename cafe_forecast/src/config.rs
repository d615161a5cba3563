//! Request-scoped configuration for forecasting, dashboards and checkout

use crate::error::{ForecastError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use sales_math::DEFAULT_TREND_BAND;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration, passed explicitly to whatever needs it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CafeConfig {
    pub forecast: ForecastConfig,
    pub dashboard: DashboardConfig,
    pub shop: ShopConfig,
}

/// Forecast settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Half-width of the "stable" trend band, in percent
    pub trend_band_percent: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            trend_band_percent: DEFAULT_TREND_BAND,
        }
    }
}

/// Upper bound for `lookback_days`, about a century
pub const MAX_LOOKBACK_DAYS: i64 = 36_600;

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Days counted in the trailing sales window
    pub lookback_days: i64,
    /// Number of best sellers to list
    pub top_products: usize,
    /// Number of recent transactions to list
    pub recent_transactions: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            top_products: 5,
            recent_transactions: 8,
        }
    }
}

/// Shop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    /// Shop-local offset from UTC, in hours
    pub utc_offset_hours: i32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self { utc_offset_hours: 7 }
    }
}

impl ShopConfig {
    /// Shop-local UTC offset
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            ForecastError::ConfigError(format!(
                "UTC offset of {} hours is out of range",
                self.utc_offset_hours
            ))
        })
    }

    /// Current shop-local time
    pub fn local_now(&self) -> Result<DateTime<FixedOffset>> {
        Ok(Utc::now().with_timezone(&self.offset()?))
    }
}

impl CafeConfig {
    /// Load configuration from a JSON file; missing keys take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ForecastError::ConfigError(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let band = self.forecast.trend_band_percent;
        if !band.is_finite() || band < 0.0 {
            return Err(ForecastError::ConfigError(format!(
                "trend_band_percent must be a finite non-negative number, got {}",
                band
            )));
        }

        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.dashboard.lookback_days) {
            return Err(ForecastError::ConfigError(format!(
                "lookback_days must be between 1 and {}, got {}",
                MAX_LOOKBACK_DAYS, self.dashboard.lookback_days
            )));
        }

        if !(-14..=14).contains(&self.shop.utc_offset_hours) {
            return Err(ForecastError::ConfigError(format!(
                "utc_offset_hours must be within ±14, got {}",
                self.shop.utc_offset_hours
            )));
        }

        Ok(())
    }
}
