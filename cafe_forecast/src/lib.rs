//! # Cafe Forecast
//!
//! Daily sales aggregation and rolling 7-day sales forecasting for a small café.
//!
//! ## Features
//!
//! - Transaction log loading (CSV) with soft handling of malformed rows
//! - Daily aggregation into an ordered (date, total) series
//! - Rolling 7-day forecast driven by a pre-trained model artifact
//! - Trend summary (past vs. future weekly average)
//! - Dashboard figures, per-day sales history, cart and product catalog
//!
//! ## How the forecast works
//!
//! The last seven daily totals seed a rolling window. For each of the next
//! seven days a [`FeatureRow`] is built from the target date and the window:
//!
//! - `day_of_week`, `month`, `is_weekend` from the date
//! - `sales_lag1` (newest value), `sales_lag7` (oldest value)
//! - `rolling_mean_7` (mean of the window)
//!
//! The model's prediction is then pushed into the window, so each day's
//! features depend on the predictions before it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cafe_forecast::data::DataLoader;
//! use cafe_forecast::models::load_model;
//! use cafe_forecast::forecaster::forecast;
//!
//! # fn main() -> cafe_forecast::Result<()> {
//! // Load the model once at startup
//! let model = load_model("sales_model.json")?;
//!
//! // Aggregate the transaction log
//! let log = DataLoader::from_csv("transactions.csv")?;
//! let series = log.daily_sales();
//!
//! // Forecast the next seven days
//! let result = forecast(&series, &model)?;
//! println!("{} ({:+.1}%)", result.trend, result.trend_percent);
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::config::CafeConfig;
pub use crate::data::{aggregate, DailySalesPoint, DataLoader, Transaction, TransactionLog};
pub use crate::error::{ForecastError, Result};
pub use crate::forecaster::{forecast, ForecastPoint, RollingForecaster, SalesForecast};
pub use crate::models::{FeatureRow, ModelArtifact, PredictFn, SalesModel};
pub use sales_math::Trend;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
