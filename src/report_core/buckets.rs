//! Grouping readings by local hour-of-day and by calendar date
//!
//! Local time is a fixed UTC offset, not a timezone database: no
//! daylight-saving adjustment is applied.

use super::reading::Reading;
use chrono::{FixedOffset, NaiveDate, Timelike};
use std::collections::BTreeMap;

pub const HOURS_PER_DAY: usize = 24;

/// Values collected for one local hour of the day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourBucket {
    pub hour: u32,
    pub temperatures: Vec<f64>,
    pub humidities: Vec<f64>,
}

impl HourBucket {
    fn new(hour: u32) -> Self {
        Self {
            hour,
            ..Default::default()
        }
    }

    /// Label used in reports (`"07:00"`)
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }
}

/// Group readings into the 24 local hours of the day.
///
/// Always yields exactly 24 buckets ordered `00:00..23:00`, also for empty input.
pub fn bucket_by_local_hour(readings: &[Reading], offset: FixedOffset) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (0..HOURS_PER_DAY as u32).map(HourBucket::new).collect();

    for reading in readings {
        let local_hour = reading.time.with_timezone(&offset).hour() as usize;
        let bucket = &mut buckets[local_hour];
        bucket.temperatures.push(reading.temperature);
        bucket.humidities.push(reading.humidity);
    }

    buckets
}

/// Group readings by the calendar date they fall on at `offset`, ascending.
///
/// With a zero offset this is the UTC date portion of the stored timestamp.
pub fn bucket_by_calendar_date(
    readings: &[Reading],
    offset: FixedOffset,
) -> BTreeMap<NaiveDate, Vec<Reading>> {
    let mut days: BTreeMap<NaiveDate, Vec<Reading>> = BTreeMap::new();

    for reading in readings {
        let date = reading.time.with_timezone(&offset).date_naive();
        days.entry(date).or_default().push(reading.clone());
    }

    days
}
