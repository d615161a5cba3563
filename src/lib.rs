//! # Cafe Owl
//!
//! Sales tooling for a small café: daily aggregation of the transaction log
//! and a rolling 7-day sales forecast.
//!
//! - [`cafe_forecast`]: transaction log, aggregation, forecasting, dashboard, cart
//! - [`sales_math`]: rolling windows, averages and trend classification
//!
//! ## Example
//!
//! ```
//! use cafe_owl_workspace::cafe_forecast::{forecast, DailySalesPoint, FeatureRow, PredictFn, Trend};
//! use chrono::{Days, NaiveDate};
//!
//! let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series: Vec<DailySalesPoint> = (0..7)
//!     .map(|i| DailySalesPoint::new(first + Days::new(i), 100.0 + i as f64))
//!     .collect();
//!
//! // A stand-in for a trained model: tomorrow looks like the weekly mean
//! let model = PredictFn::new("weekly mean", |row: &FeatureRow| Ok(row.rolling_mean_7));
//!
//! let result = forecast(&series, &model).unwrap();
//! assert_eq!(result.points.len(), 7);
//! assert_eq!(result.trend, Trend::Stable);
//! ```

pub use cafe_forecast;
pub use sales_math;

pub use cafe_forecast::{aggregate, forecast, ForecastError, SalesForecast, Trend};
