//! Sensor reading as stored by the ingestion path

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// One sensor sample. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    pub fn new(time: DateTime<Utc>, temperature: f64, humidity: f64) -> Self {
        Self {
            time,
            temperature,
            humidity,
        }
    }

    /// Parse a Reading from a JSON row (`{"time": "...", "temperature": .., "humidity": ..}`)
    pub fn from_json(line: &str) -> Result<Self, Box<dyn Error>> {
        let reading: Reading = serde_json::from_str(line)?;
        Ok(reading)
    }

    /// Stored form of the timestamp: fixed-width RFC 3339 with millisecond precision.
    ///
    /// Fixed width keeps lexical order equal to chronological order in the store.
    pub fn time_key(&self) -> String {
        format_instant(&self.time)
    }
}

/// Format an instant the way the store keeps it (`2024-01-01T05:00:00.000Z`)
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_reading_json() {
        let line = r#"{"time":"2024-01-01T05:00:00Z","temperature":20.0,"humidity":50.0}"#;

        let reading = Reading::from_json(line).unwrap();
        assert_eq!(reading.time, Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap());
        assert_eq!(reading.temperature, 20.0);
        assert_eq!(reading.humidity, 50.0);
    }

    #[test]
    fn test_parse_reading_with_offset() {
        // Store rows written with an explicit offset normalize to UTC
        let line = r#"{"time":"2024-01-01T00:00:00-05:00","temperature":21.5,"humidity":48.2}"#;

        let reading = Reading::from_json(line).unwrap();
        assert_eq!(reading.time_key(), "2024-01-01T05:00:00.000Z");
    }

    #[test]
    fn test_malformed_reading() {
        let line = r#"{"time": "yesterday", "temperature": 1.0}"#;
        assert!(Reading::from_json(line).is_err());
    }
}
