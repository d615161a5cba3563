//! Cart lines and the product catalog used when recording sales

use crate::data::Transaction;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

/// One product in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    /// Create a cart line; quantity must be at least one
    pub fn new(
        product: impl Into<String>,
        category: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Result<Self> {
        let product = product.into();
        if product.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Product name must not be empty".to_string(),
            ));
        }

        if quantity == 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Quantity for '{}' must be at least 1",
                product
            )));
        }

        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Unit price for '{}' must be a finite non-negative amount, got {}",
                product, unit_price
            )));
        }

        Ok(Self {
            product,
            category: category.into(),
            unit_price,
            quantity,
        })
    }

    /// Quantity × unit price
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    /// Record this line as a sale at the given shop-local time
    pub fn to_transaction(&self, at: DateTime<FixedOffset>) -> Transaction {
        Transaction {
            date: at.date_naive(),
            time: Some(at.time()),
            product: self.product.clone(),
            category: self.category.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            total: self.total(),
        }
    }
}

/// Caller-owned shopping cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line to the cart
    pub fn add(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line totals
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Turn every line into a transaction and empty the cart
    pub fn checkout(&mut self, at: DateTime<FixedOffset>) -> Vec<Transaction> {
        self.lines
            .drain(..)
            .map(|line| line.to_transaction(at))
            .collect()
    }
}

/// A product offered for sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub unit_price: f64,
}

/// Products known from the transaction log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Distinct products in log order; the first occurrence sets category and price
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut products: Vec<Product> = Vec::new();
        for tx in transactions {
            if tx.product.is_empty() || products.iter().any(|p| p.name == tx.product) {
                continue;
            }
            products.push(Product {
                name: tx.product.clone(),
                category: tx.category.clone(),
                unit_price: tx.unit_price,
            });
        }

        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by name
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Products in one category
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Distinct categories, in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Cart line for a catalog product at its listed price
    pub fn line(&self, name: &str, quantity: u32) -> Result<CartLine> {
        let product = self.get(name).ok_or_else(|| {
            ForecastError::InvalidParameter(format!("Unknown product '{}'", name))
        })?;

        CartLine::new(
            product.name.clone(),
            product.category.clone(),
            product.unit_price,
            quantity,
        )
    }

    /// Add a new product; names must be unique
    pub fn add_product(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        unit_price: f64,
    ) -> Result<&Product> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Product name must not be empty".to_string(),
            ));
        }
        if self.get(&name).is_some() {
            return Err(ForecastError::InvalidParameter(format!(
                "Product '{}' already exists",
                name
            )));
        }
        if !unit_price.is_finite() || unit_price < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Unit price for '{}' must be a finite non-negative amount, got {}",
                name, unit_price
            )));
        }

        self.products.push(Product {
            name,
            category: category.into(),
            unit_price,
        });
        Ok(&self.products[self.products.len() - 1])
    }

    /// Zero-quantity transaction that registers a product in the log
    pub fn catalog_entry(product: &Product, at: DateTime<FixedOffset>) -> Transaction {
        Transaction {
            date: at.date_naive(),
            time: NaiveTime::from_hms_opt(0, 0, 0),
            product: product.name.clone(),
            category: product.category.clone(),
            quantity: 0,
            unit_price: product.unit_price,
            total: 0.0,
        }
    }
}
