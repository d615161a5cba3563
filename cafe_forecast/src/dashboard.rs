//! Business overview: today's sales against the trailing average,
//! best sellers, recent activity and per-day history

use crate::config::DashboardConfig;
use crate::data::Transaction;
use chrono::{Days, NaiveDate};
use sales_math::percent_change;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

/// Units sold for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductQuantity {
    pub product: String,
    pub quantity: u64,
}

/// Today's sales relative to the trailing daily average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyStatus {
    Below,
    AtOrAbove,
}

/// Summary figures for the most recent day in the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Most recent date in the log
    pub latest_date: NaiveDate,
    /// Sales on `latest_date`
    pub today_sales: f64,
    /// Number of transactions on `latest_date`
    pub today_bills: usize,
    /// Sales in the trailing lookback window
    pub window_sales: f64,
    /// Distinct dates with sales in the window
    pub days_with_data: usize,
    /// `window_sales / days_with_data`
    pub avg_daily: f64,
    /// Today against the daily average, in percent; `None` without a positive average
    pub diff_percent: Option<f64>,
    pub status: Option<DailyStatus>,
    /// Best sellers by units, descending
    pub top_products: Vec<ProductQuantity>,
    /// Most recent transactions, newest first
    pub recent: Vec<Transaction>,
}

impl DashboardSummary {
    /// Build the summary; `None` when there are no transactions
    pub fn build(transactions: &[Transaction], config: &DashboardConfig) -> Option<Self> {
        let latest_date = transactions.iter().map(|tx| tx.date).max()?;

        let today: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.date == latest_date)
            .collect();
        let today_sales: f64 = today.iter().map(|tx| tx.total).sum();

        // `None` when the lookback reaches past the earliest representable date
        let window_start = match u64::try_from(config.lookback_days) {
            Ok(days) => latest_date.checked_sub_days(Days::new(days)),
            Err(_) => Some(latest_date),
        };
        let in_window: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| window_start.map_or(true, |start| tx.date > start))
            .collect();
        let window_sales: f64 = in_window.iter().map(|tx| tx.total).sum();
        let days_with_data = in_window
            .iter()
            .map(|tx| tx.date)
            .collect::<BTreeSet<_>>()
            .len();

        let avg_daily = if days_with_data > 0 {
            window_sales / days_with_data as f64
        } else {
            0.0
        };

        let (diff_percent, status) = if avg_daily > 0.0 {
            let status = if today_sales < avg_daily {
                DailyStatus::Below
            } else {
                DailyStatus::AtOrAbove
            };
            (percent_change(avg_daily, today_sales).ok(), Some(status))
        } else {
            (None, None)
        };

        Some(Self {
            latest_date,
            today_sales,
            today_bills: today.len(),
            window_sales,
            days_with_data,
            avg_daily,
            diff_percent,
            status,
            top_products: top_products(transactions, config.top_products),
            recent: recent_transactions(transactions, config.recent_transactions),
        })
    }
}

/// Products ranked by units sold, ties broken by name
pub fn top_products(transactions: &[Transaction], limit: usize) -> Vec<ProductQuantity> {
    let mut quantities: HashMap<&str, u64> = HashMap::new();
    for tx in transactions {
        *quantities.entry(tx.product.as_str()).or_insert(0) += tx.quantity as u64;
    }

    let mut ranked: Vec<ProductQuantity> = quantities
        .into_iter()
        .map(|(product, quantity)| ProductQuantity {
            product: product.to_string(),
            quantity,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.product.cmp(&b.product))
    });
    ranked.truncate(limit);
    ranked
}

/// The `limit` newest transactions by date and time
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|tx| Reverse((tx.date, tx.time)));
    sorted.into_iter().take(limit).cloned().collect()
}

/// All sales on one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesHistory {
    pub date: NaiveDate,
    pub total: f64,
    /// Newest first
    pub transactions: Vec<Transaction>,
}

/// Sales history for a single date
pub fn sales_history(transactions: &[Transaction], date: NaiveDate) -> SalesHistory {
    let mut day: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| tx.date == date)
        .cloned()
        .collect();
    day.sort_by_key(|tx| Reverse(tx.time));

    SalesHistory {
        date,
        total: day.iter().map(|tx| tx.total).sum(),
        transactions: day,
    }
}
