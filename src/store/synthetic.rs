//! Synthetic readings for local development and demos

use crate::report_core::aggregate::round_to;
use crate::report_core::Reading;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const TEMPERATURE_RANGE: (f64, f64) = (15.0, 35.0);
pub const HUMIDITY_RANGE: (f64, f64) = (30.0, 90.0);

/// One random sample, temperature 15-35 °C and humidity 30-90 %, one decimal
pub fn random_reading<R: Rng + ?Sized>(rng: &mut R, time: DateTime<Utc>) -> Reading {
    let temperature = round_to(rng.gen_range(TEMPERATURE_RANGE.0..TEMPERATURE_RANGE.1), 1);
    let humidity = round_to(rng.gen_range(HUMIDITY_RANGE.0..HUMIDITY_RANGE.1), 1);
    Reading::new(time, temperature, humidity)
}

/// Readings every `interval_minutes` from `start` through `end` (inclusive)
pub fn generate_readings<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_minutes: i64,
) -> Vec<Reading> {
    if interval_minutes <= 0 {
        return Vec::new();
    }

    let step = Duration::minutes(interval_minutes);
    let mut readings = Vec::new();
    let mut current = start;

    while current <= end {
        readings.push(random_reading(rng, current));
        current += step;
    }

    readings
}
