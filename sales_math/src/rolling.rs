//! Fixed-length rolling window over a sales series
//!
//! The window is always full: it can only be created from at least
//! `capacity` values, and every `push` evicts the oldest value.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Rolling window of the most recent values, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    /// Seed a window with the last `capacity` values of `series`
    pub fn from_tail(series: &[f64], capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MathError::InvalidInput(
                "Window capacity must be greater than zero".to_string(),
            ));
        }

        if series.len() < capacity {
            return Err(MathError::InsufficientData(format!(
                "Need {} values to seed the window, have {}",
                capacity,
                series.len()
            )));
        }

        let values: VecDeque<f64> = series[series.len() - capacity..].iter().copied().collect();

        Ok(Self { capacity, values })
    }

    /// Append a value and evict the oldest one, returning the evicted value
    pub fn push(&mut self, value: f64) -> f64 {
        self.values.push_back(value);
        self.values.pop_front().unwrap_or_default()
    }

    /// Value `k` positions back: `lag(1)` is the newest, `lag(capacity)` the oldest
    pub fn lag(&self, k: usize) -> Result<f64> {
        if k == 0 || k > self.capacity {
            return Err(MathError::InvalidInput(format!(
                "Lag must be between 1 and {}, got {}",
                self.capacity, k
            )));
        }

        self.values
            .get(self.capacity - k)
            .copied()
            .ok_or_else(|| MathError::InsufficientData(format!("No value at lag {}", k)))
    }

    /// Newest value in the window
    pub fn newest(&self) -> f64 {
        self.values.back().copied().unwrap_or_default()
    }

    /// Oldest value in the window
    pub fn oldest(&self) -> f64 {
        self.values.front().copied().unwrap_or_default()
    }

    /// Arithmetic mean of the values currently held
    pub fn mean(&self) -> f64 {
        self.sum() / self.capacity as f64
    }

    /// Sum of the values currently held, recomputed on every call
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Number of values held; always equal to the capacity
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// A seeded window is never empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Configured window length
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over the values, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Copy the values out, oldest first
    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}
