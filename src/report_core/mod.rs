//! Report Core - Daily and Range Aggregation
//!
//! # Architecture
//!
//! ```text
//! YYYY-MM-DD → parse_report_date → QueryWindow (fixed UTC offset)
//!     ↓
//! ReadingStore::query_readings
//!     ↓
//! bucket_by_local_hour / bucket_by_calendar_date
//!     ↓
//! average / min / max (Option: empty input is "no data")
//!     ↓
//! DailyReport (2 decimals) | RangeReport (1 decimal)
//! ```

pub mod aggregate;
pub mod buckets;
pub mod daily;
pub mod error;
pub mod range;
pub mod reading;
pub mod service;
pub mod window;

pub use aggregate::{average, Stats};
pub use buckets::{bucket_by_calendar_date, bucket_by_local_hour, HourBucket};
pub use daily::{DailyReport, HourlyAverage};
pub use error::ReportError;
pub use range::{DailyAverage, RangeReport};
pub use reading::Reading;
pub use service::{offset_from_minutes, ReportService};
pub use window::{format_report_date, parse_report_date, QueryWindow};
