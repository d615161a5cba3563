//! Transaction log handling and daily sales aggregation

use crate::error::{ForecastError, Result};
use crate::utils::{parse_date, parse_time};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns a transaction log must carry for aggregation to work
const REQUIRED_COLUMNS: [&str; 2] = ["transaction_date", "total_sales"];

/// A transaction row exactly as the point-of-sale shell stores it
///
/// Every field that can be malformed at the source is kept raw or optional;
/// [`TransactionRecord::validate`] turns it into a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_date: Option<String>,
    pub transaction_time: Option<String>,
    #[serde(default)]
    pub product_detail: String,
    #[serde(default)]
    pub product_category: String,
    /// Cells that do not parse as numbers are read as `None`
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub transaction_qty: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub total_sales: Option<f64>,
}

/// A validated sale line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the sale
    pub date: NaiveDate,
    /// Time of day, informational only
    pub time: Option<NaiveTime>,
    /// Product identifier
    pub product: String,
    /// Product category
    pub category: String,
    /// Units sold; zero for catalog entries
    pub quantity: u32,
    /// Price per unit
    pub unit_price: f64,
    /// Line total (quantity × unit price)
    pub total: f64,
}

/// One total-sales value for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySalesPoint {
    pub date: NaiveDate,
    pub total: f64,
}

impl DailySalesPoint {
    pub fn new(date: NaiveDate, total: f64) -> Self {
        Self { date, total }
    }
}

/// Anything that carries a sale date and a line total
pub trait SaleLine {
    /// Calendar date of the sale, if it can be determined
    fn sale_date(&self) -> Option<NaiveDate>;

    /// Finite line total, if present
    fn line_total(&self) -> Option<f64>;
}

impl SaleLine for TransactionRecord {
    fn sale_date(&self) -> Option<NaiveDate> {
        self.transaction_date.as_deref().and_then(parse_date)
    }

    fn line_total(&self) -> Option<f64> {
        self.total_sales.filter(|total| total.is_finite())
    }
}

impl SaleLine for Transaction {
    fn sale_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn line_total(&self) -> Option<f64> {
        Some(self.total).filter(|total| total.is_finite())
    }
}

impl TransactionRecord {
    /// Validate the raw row into a [`Transaction`]
    pub fn validate(&self) -> Result<Transaction> {
        let raw_date = self.transaction_date.as_deref().unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| {
            ForecastError::MalformedTransaction(format!(
                "unparseable transaction date '{}'",
                raw_date
            ))
        })?;

        let total = self.line_total().ok_or_else(|| {
            ForecastError::MalformedTransaction(format!(
                "missing or non-finite total for '{}' on {}",
                self.product_detail, date
            ))
        })?;

        let quantity = match self.transaction_qty {
            Some(qty) if qty >= 0.0 && qty.fract() == 0.0 && qty <= u32::MAX as f64 => qty as u32,
            other => {
                return Err(ForecastError::MalformedTransaction(format!(
                    "invalid quantity {:?} for '{}' on {}",
                    other, self.product_detail, date
                )))
            }
        };

        let unit_price = match self.unit_price {
            Some(price) if price.is_finite() && price >= 0.0 => price,
            other => {
                return Err(ForecastError::MalformedTransaction(format!(
                    "invalid unit price {:?} for '{}' on {}",
                    other, self.product_detail, date
                )))
            }
        };

        Ok(Transaction {
            date,
            time: self.transaction_time.as_deref().and_then(parse_time),
            product: self.product_detail.clone(),
            category: self.product_category.clone(),
            quantity,
            unit_price,
            total,
        })
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            transaction_date: Some(tx.date.format("%Y-%m-%d").to_string()),
            transaction_time: tx.time.map(|t| t.format("%H:%M:%S").to_string()),
            product_detail: tx.product.clone(),
            product_category: tx.category.clone(),
            transaction_qty: Some(tx.quantity as f64),
            unit_price: Some(tx.unit_price),
            total_sales: Some(tx.total),
        }
    }
}

/// Collapse sale lines into one total per calendar date, oldest first
///
/// Lines without a usable date or total are dropped; they never make the
/// aggregation fail. Dates without any sale are not filled in.
pub fn aggregate<'a, T, I>(transactions: I) -> Vec<DailySalesPoint>
where
    T: SaleLine + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut dropped = 0usize;

    for (index, line) in transactions.into_iter().enumerate() {
        match (line.sale_date(), line.line_total()) {
            (Some(date), Some(total)) => *totals.entry(date).or_insert(0.0) += total,
            _ => {
                dropped += 1;
                debug!(index, "dropping transaction without a usable date or total");
            }
        }
    }

    if dropped > 0 {
        warn!(dropped, days = totals.len(), "dropped malformed transactions during aggregation");
    }

    totals
        .into_iter()
        .map(|(date, total)| DailySalesPoint { date, total })
        .collect()
}

/// In-memory transaction log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
}

impl TransactionLog {
    /// Create a log from raw records
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// Create a log from validated transactions
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            records: transactions.iter().map(TransactionRecord::from).collect(),
        }
    }

    /// Raw records, in log order
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Number of raw records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a validated transaction
    pub fn push(&mut self, transaction: &Transaction) {
        self.records.push(TransactionRecord::from(transaction));
    }

    /// All records that validate, in log order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.records
            .iter()
            .filter_map(|record| match record.validate() {
                Ok(tx) => Some(tx),
                Err(err) => {
                    debug!(error = %err, "skipping malformed transaction");
                    None
                }
            })
            .collect()
    }

    /// Daily sales series for the forecaster
    pub fn daily_sales(&self) -> Vec<DailySalesPoint> {
        aggregate(&self.records)
    }
}

/// Data loader for transaction logs
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a transaction log from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<TransactionLog> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a transaction log from any CSV reader
    ///
    /// Rows that cannot be read at all are skipped with a warning; a header
    /// without the required columns is an error.
    pub fn from_reader<R: Read>(reader: R) -> Result<TransactionLog> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(ForecastError::ValidationError(format!(
                    "Transaction log is missing the '{}' column",
                    required
                )));
            }
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (row, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(err) => {
                    skipped += 1;
                    debug!(row, error = %err, "skipping unreadable transaction row");
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "skipped unreadable transaction rows");
        }
        info!(rows = records.len(), "loaded transaction log");

        Ok(TransactionLog::new(records))
    }
}
