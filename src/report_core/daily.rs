//! Daily report: whole-day statistics plus 24 local-hour averages

use super::aggregate::{average, round_to, Stats, DAILY_DECIMALS};
use super::buckets::bucket_by_local_hour;
use super::error::ReportError;
use super::reading::Reading;
use super::window::format_report_date;
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyAverage {
    pub hour: String,
    pub average_temperature: Option<f64>,
    pub average_humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: String,
    pub average_temperature: f64,
    pub average_humidity: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_humidity: f64,
    pub max_humidity: f64,
    pub readings: Vec<Reading>,
    pub hourly_averages: Vec<HourlyAverage>,
}

impl DailyReport {
    /// Build the report from the readings of one local day.
    ///
    /// Zero readings is `NoData`; min/max are never computed over empty input.
    pub fn from_readings(
        date: NaiveDate,
        mut readings: Vec<Reading>,
        offset: FixedOffset,
    ) -> Result<Self, ReportError> {
        readings.sort_by_key(|r| r.time);

        let temperatures: Vec<f64> = readings.iter().map(|r| r.temperature).collect();
        let humidities: Vec<f64> = readings.iter().map(|r| r.humidity).collect();

        let temperature = Stats::from_values(&temperatures).ok_or(ReportError::NoData)?;
        let humidity = Stats::from_values(&humidities).ok_or(ReportError::NoData)?;

        let hourly_averages = bucket_by_local_hour(&readings, offset)
            .iter()
            .map(|bucket| HourlyAverage {
                hour: bucket.label(),
                average_temperature: average(&bucket.temperatures)
                    .map(|v| round_to(v, DAILY_DECIMALS)),
                average_humidity: average(&bucket.humidities)
                    .map(|v| round_to(v, DAILY_DECIMALS)),
            })
            .collect();

        Ok(Self {
            date: format_report_date(date),
            average_temperature: round_to(temperature.mean, DAILY_DECIMALS),
            average_humidity: round_to(humidity.mean, DAILY_DECIMALS),
            min_temperature: temperature.min,
            max_temperature: temperature.max,
            min_humidity: humidity.min,
            max_humidity: humidity.max,
            readings,
            hourly_averages,
        })
    }
}
