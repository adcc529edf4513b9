//! Report service: query window → store → aggregation
//!
//! Stateless per request; concurrent requests share nothing but the store.

use super::daily::DailyReport;
use super::error::ReportError;
use super::range::RangeReport;
use super::window::QueryWindow;
use crate::store::ReadingStore;
use chrono::{FixedOffset, NaiveDate};
use std::sync::Arc;

/// Default local offset: UTC-5, no daylight saving
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -300;

pub const DEFAULT_MAX_RANGE_DAYS: i64 = 366;

pub struct ReportService {
    store: Arc<dyn ReadingStore>,
    offset: FixedOffset,
    max_range_days: i64,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReadingStore>, offset: FixedOffset) -> Self {
        Self {
            store,
            offset,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
        }
    }

    pub fn with_max_range_days(mut self, days: i64) -> Self {
        self.max_range_days = days;
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Statistics for one local calendar day
    pub async fn build_daily_report(&self, date: NaiveDate) -> Result<DailyReport, ReportError> {
        let window = QueryWindow::for_day(date, self.offset);
        let readings = self.store.query_readings(window.start, window.end).await?;

        log::debug!("📊 Daily report {}: {} readings", date, readings.len());

        DailyReport::from_readings(date, readings, self.offset)
    }

    /// Per-date averages for `start..=end`
    pub async fn build_range_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RangeReport, ReportError> {
        if end < start {
            return Err(ReportError::InvalidRange { start, end });
        }

        let span_days = (end - start).num_days() + 1;
        if span_days > self.max_range_days {
            return Err(ReportError::Validation(format!(
                "Date range spans {} days, maximum is {}",
                span_days, self.max_range_days
            )));
        }

        let window = QueryWindow::for_days(start, end, self.offset);
        let readings = self.store.query_readings(window.start, window.end).await?;

        log::debug!(
            "📊 Range report {}..{}: {} readings",
            start,
            end,
            readings.len()
        );

        RangeReport::from_readings(start, end, &readings, self.offset)
    }
}

/// Offset from signed minutes east of UTC (`-300` is UTC-5)
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}
