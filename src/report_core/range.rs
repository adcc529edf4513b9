//! Range report: per-date averages across a span of calendar dates

use super::aggregate::{average, round_to, RANGE_DECIMALS};
use super::buckets::bucket_by_calendar_date;
use super::error::ReportError;
use super::reading::Reading;
use super::window::format_report_date;
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAverage {
    pub date: String,
    pub average_temperature: f64,
    pub average_humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeReport {
    pub start_date: String,
    pub end_date: String,
    pub daily_data: Vec<DailyAverage>,
}

impl RangeReport {
    /// One entry per date holding at least one reading, ascending.
    /// Dates without readings are omitted, not zero-filled.
    pub fn from_readings(
        start: NaiveDate,
        end: NaiveDate,
        readings: &[Reading],
        offset: FixedOffset,
    ) -> Result<Self, ReportError> {
        if readings.is_empty() {
            return Err(ReportError::NoData);
        }

        let mut daily_data = Vec::new();
        for (date, day_readings) in bucket_by_calendar_date(readings, offset) {
            // Rows outside [start, end] can only come from a store that ignores bounds
            if date < start || date > end {
                log::warn!("⚠️  Skipping reading on {} outside range {}..{}", date, start, end);
                continue;
            }

            let temperatures: Vec<f64> = day_readings.iter().map(|r| r.temperature).collect();
            let humidities: Vec<f64> = day_readings.iter().map(|r| r.humidity).collect();

            if let (Some(t), Some(h)) = (average(&temperatures), average(&humidities)) {
                daily_data.push(DailyAverage {
                    date: format_report_date(date),
                    average_temperature: round_to(t, RANGE_DECIMALS),
                    average_humidity: round_to(h, RANGE_DECIMALS),
                });
            }
        }

        if daily_data.is_empty() {
            return Err(ReportError::NoData);
        }

        Ok(Self {
            start_date: format_report_date(start),
            end_date: format_report_date(end),
            daily_data,
        })
    }
}
