//! Arithmetic aggregates over reading values
//!
//! Empty input is "no data": every aggregate returns `None` instead of a
//! NaN or an infinite sentinel.

/// Decimal places used by the daily report (hourly path)
pub const DAILY_DECIMALS: u32 = 2;

/// Decimal places used by the range report and live display values
pub const RANGE_DECIMALS: u32 = 1;

pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Mean/min/max of a non-empty sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Stats {
    /// Returns `None` when `values` is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: average(values)?,
            min: min(values)?,
            max: max(values)?,
            count: values.len(),
        })
    }
}
