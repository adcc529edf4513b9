//! Bounded newest-first window of live readings and its published snapshot

use crate::report_core::aggregate::{round_to, RANGE_DECIMALS};
use crate::report_core::Reading;
use crate::store::StoredReading;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_LIVE_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedState {
    Disconnected,
    Subscribing,
    Streaming,
}

impl FeedState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedState::Disconnected => "disconnected",
            FeedState::Subscribing => "subscribing",
            FeedState::Streaming => "streaming",
        }
    }
}

/// Values of the newest reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentReading {
    pub temperature: f64,
    pub humidity: f64,
    pub time: DateTime<Utc>,
}

impl CurrentReading {
    pub fn display_temperature(&self) -> String {
        format!("{:.1}°C", round_to(self.temperature, RANGE_DECIMALS))
    }

    pub fn display_humidity(&self) -> String {
        format!("{:.1}%", round_to(self.humidity, RANGE_DECIMALS))
    }
}

/// Immutable view published after every change. Readers never see a
/// current value that disagrees with `readings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveSnapshot {
    pub state: FeedState,
    pub current: Option<CurrentReading>,
    pub readings: Vec<Reading>,
}

impl Default for LiveSnapshot {
    fn default() -> Self {
        Self {
            state: FeedState::Disconnected,
            current: None,
            readings: Vec::new(),
        }
    }
}

pub struct LiveWindow {
    readings: VecDeque<StoredReading>,
    capacity: usize,
}

impl LiveWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend and truncate to capacity. Returns false for a row already held
    /// (same id), which happens when a notification overlaps the backfill.
    pub fn push(&mut self, stored: StoredReading) -> bool {
        if self.readings.iter().any(|held| held.id == stored.id) {
            return false;
        }
        self.readings.push_front(stored);
        self.readings.truncate(self.capacity);
        true
    }

    /// Replace the contents with `newest_first`, keeping at most capacity entries
    pub fn replace(&mut self, newest_first: Vec<StoredReading>) {
        self.readings = newest_first.into_iter().take(self.capacity).collect();
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.front().map(|stored| &stored.reading)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn snapshot(&self, state: FeedState) -> LiveSnapshot {
        LiveSnapshot {
            state,
            current: self.latest().map(|r| CurrentReading {
                temperature: r.temperature,
                humidity: r.humidity,
                time: r.time,
            }),
            readings: self.readings.iter().map(|s| s.reading.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn nth(i: i64) -> StoredReading {
        StoredReading::new(
            i,
            Reading::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(i),
                i as f64,
                50.0,
            ),
        )
    }

    #[test]
    fn test_window_keeps_newest_fifty() {
        let mut window = LiveWindow::new(DEFAULT_LIVE_WINDOW);
        for i in 1..=51 {
            window.push(nth(i));
        }

        let snapshot = window.snapshot(FeedState::Streaming);
        let temps: Vec<f64> = snapshot.readings.iter().map(|r| r.temperature).collect();
        let expected: Vec<f64> = (2..=51).rev().map(|i| i as f64).collect();

        assert_eq!(window.len(), 50);
        assert_eq!(temps, expected);
        assert_eq!(snapshot.current.unwrap().temperature, 51.0);
    }

    #[test]
    fn test_same_row_is_ignored() {
        let mut window = LiveWindow::new(3);
        assert!(window.push(nth(1)));
        assert!(!window.push(nth(1)));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_identical_readings_in_distinct_rows_are_kept() {
        let mut window = LiveWindow::new(5);
        let reading = nth(1).reading;

        assert!(window.push(StoredReading::new(10, reading.clone())));
        assert!(window.push(nth(2)));
        assert!(window.push(StoredReading::new(11, reading.clone())));

        let snapshot = window.snapshot(FeedState::Streaming);
        assert_eq!(window.len(), 3);
        assert_eq!(snapshot.readings[0], reading);
        assert_eq!(snapshot.readings[2], reading);
    }

    #[test]
    fn test_replace_truncates() {
        let mut window = LiveWindow::new(2);
        window.replace(vec![nth(3), nth(2), nth(1)]);

        assert_eq!(window.len(), 2);
        assert_eq!(window.latest().unwrap().temperature, 3.0);
    }

    #[test]
    fn test_empty_snapshot_has_no_current() {
        let window = LiveWindow::new(5);
        let snapshot = window.snapshot(FeedState::Subscribing);

        assert!(window.is_empty());
        assert!(snapshot.current.is_none());
        assert_eq!(snapshot.state.as_str(), "subscribing");
    }

    #[test]
    fn test_display_values_one_decimal() {
        let current = CurrentReading {
            temperature: 21.46,
            humidity: 54.0,
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };

        assert_eq!(current.display_temperature(), "21.5°C");
        assert_eq!(current.display_humidity(), "54.0%");
    }
}
