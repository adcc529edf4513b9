//! Report date parsing and query windows
//!
//! Report dates are local calendar dates at a fixed UTC offset. A window is
//! the inclusive UTC instant range handed to the store.

use super::error::ReportError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` report date
pub fn parse_report_date(value: &str) -> Result<NaiveDate, ReportError> {
    let trimmed = value.trim();
    // chrono accepts single-digit months/days; the wire format does not
    if trimmed.len() != 10 {
        return Err(ReportError::Validation(format!(
            "Invalid date '{}', expected YYYY-MM-DD",
            value
        )));
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        ReportError::Validation(format!("Invalid date '{}': {}", value, e))
    })
}

pub fn format_report_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive UTC instant range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// `[date 00:00 local, date+1 00:00 local - 1ms]`
    pub fn for_day(date: NaiveDate, offset: FixedOffset) -> Self {
        Self::for_days(date, date, offset)
    }

    /// `[start 00:00 local, end+1 00:00 local - 1ms]`, i.e. through `end 23:59:59.999`
    pub fn for_days(start: NaiveDate, end: NaiveDate, offset: FixedOffset) -> Self {
        let start_instant = local_midnight(start, offset);
        let end_instant = local_midnight(end, offset) + Duration::days(1) - Duration::milliseconds(1);

        Self {
            start: start_instant,
            end: end_instant,
        }
    }
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    // A fixed offset has exactly one mapping for every local time
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| {
            Utc.from_utc_datetime(&(naive - Duration::seconds(offset.local_minus_utc() as i64)))
        })
}
