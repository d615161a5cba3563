//! Rolling 7-day sales forecaster
//!
//! The forecaster seeds a rolling window with the last seven daily totals,
//! then predicts one day at a time. Each prediction is pushed into the window
//! before the next day's features are built, so later days depend on earlier
//! predictions rather than on actual sales.

use crate::config::ForecastConfig;
use crate::data::DailySalesPoint;
use crate::error::{ForecastError, Result};
use crate::models::{FeatureRow, SalesModel};
use chrono::{Days, NaiveDate};
use sales_math::{percent_change, RollingWindow, Trend, TrendClassifier};
use serde::Serialize;
use tracing::{debug, info};

/// Number of trailing daily totals the rolling history holds
pub const HISTORY_WINDOW: usize = 7;

/// Number of days forecast per call
pub const FORECAST_HORIZON: usize = 7;

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_total: f64,
}

/// Forecast for the next seven days with its trend summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesForecast {
    /// One point per forecast day, oldest first
    pub points: Vec<ForecastPoint>,
    /// Mean of the last seven actual daily totals
    pub avg_past_7: f64,
    /// Mean of the seven predictions
    pub avg_future_7: f64,
    /// Relative change from `avg_past_7` to `avg_future_7`, in percent
    pub trend_percent: f64,
    /// Classification of `trend_percent`
    pub trend: Trend,
}

impl SalesForecast {
    /// Predicted totals, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted_total).collect()
    }

    /// Forecast dates, oldest first
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

/// State extracted from the series before any prediction is made
#[derive(Debug)]
struct Seed {
    history: RollingWindow,
    last_date: NaiveDate,
    avg_past_7: f64,
}

impl Seed {
    fn from_series(series: &[DailySalesPoint]) -> Result<Self> {
        if series.len() < HISTORY_WINDOW {
            return Err(ForecastError::InsufficientHistory {
                required: HISTORY_WINDOW,
                available: series.len(),
            });
        }

        if let Some(pair) = series.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(ForecastError::ValidationError(format!(
                "Daily series must have strictly increasing dates, found {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        if let Some(point) = series.iter().find(|p| !p.total.is_finite()) {
            return Err(ForecastError::ValidationError(format!(
                "Daily total for {} is not finite",
                point.date
            )));
        }

        let totals: Vec<f64> = series.iter().map(|p| p.total).collect();
        let history = RollingWindow::from_tail(&totals, HISTORY_WINDOW)?;
        let avg_past_7 = history.mean();

        if avg_past_7 == 0.0 {
            return Err(ForecastError::DivisionUndefined(
                "Average of the last 7 days is zero, trend percent is undefined".to_string(),
            ));
        }

        let last_date = series[series.len() - 1].date;

        Ok(Self {
            history,
            last_date,
            avg_past_7,
        })
    }
}

/// Produces 7-day forecasts; holds only the trend band
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollingForecaster {
    classifier: TrendClassifier,
}

impl RollingForecaster {
    /// Create a forecaster from configuration
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        Self::with_trend_band(config.trend_band_percent)
    }

    /// Create a forecaster with a custom trend band, in percent
    pub fn with_trend_band(band: f64) -> Result<Self> {
        let classifier = TrendClassifier::new(band)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        Ok(Self { classifier })
    }

    /// Half-width of the "stable" band, in percent
    pub fn trend_band(&self) -> f64 {
        self.classifier.band()
    }

    /// Forecast the seven days after the last point of `series`
    ///
    /// `series` must be sorted by date with at least seven points. Every
    /// precondition is checked before the model is called; a model failure
    /// aborts the remaining steps and no partial forecast is returned.
    pub fn forecast<M>(&self, series: &[DailySalesPoint], model: &M) -> Result<SalesForecast>
    where
        M: SalesModel + ?Sized,
    {
        let Seed {
            mut history,
            last_date,
            avg_past_7,
        } = Seed::from_series(series)?;

        let mut points = Vec::with_capacity(FORECAST_HORIZON);
        for step in 1..=FORECAST_HORIZON {
            let date = last_date
                .checked_add_days(Days::new(step as u64))
                .ok_or_else(|| {
                    ForecastError::ValidationError(format!(
                        "Forecast date overflows after {}",
                        last_date
                    ))
                })?;

            let row = FeatureRow::build(date, &history)?;
            let prediction = model
                .predict(&row)
                .map_err(|err| inference_error(step, err))?;

            if !prediction.is_finite() {
                return Err(ForecastError::ModelInferenceError {
                    step,
                    reason: format!("model returned non-finite prediction {}", prediction),
                });
            }

            debug!(
                step,
                %date,
                lag1 = row.sales_lag1,
                lag7 = row.sales_lag7,
                rolling_mean_7 = row.rolling_mean_7,
                prediction,
                "forecast step"
            );

            points.push(ForecastPoint {
                date,
                predicted_total: prediction,
            });
            history.push(prediction);
            debug_assert_eq!(history.len(), HISTORY_WINDOW);
        }

        let predictions: Vec<f64> = points.iter().map(|p| p.predicted_total).collect();
        let avg_future_7 = sales_math::mean(&predictions)?;
        let trend_percent = percent_change(avg_past_7, avg_future_7)?;
        let trend = self.classifier.classify(trend_percent);

        info!(
            model = model.name(),
            %last_date,
            avg_past_7,
            avg_future_7,
            trend_percent,
            %trend,
            "forecast complete"
        );

        Ok(SalesForecast {
            points,
            avg_past_7,
            avg_future_7,
            trend_percent,
            trend,
        })
    }
}

/// Forecast with the default ±5% trend band
pub fn forecast<M>(series: &[DailySalesPoint], model: &M) -> Result<SalesForecast>
where
    M: SalesModel + ?Sized,
{
    RollingForecaster::default().forecast(series, model)
}

/// Attribute a model failure to the forecast step that hit it
fn inference_error(step: usize, err: ForecastError) -> ForecastError {
    let reason = match err {
        ForecastError::ModelInferenceError { reason, .. } => reason,
        other => other.to_string(),
    };
    ForecastError::ModelInferenceError { step, reason }
}
