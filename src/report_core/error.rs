use crate::store::StoreError;
use chrono::NaiveDate;

/// Per-request report failure. All variants are terminal; nothing is retried.
#[derive(Debug)]
pub enum ReportError {
    /// Missing or malformed request parameter
    Validation(String),
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// The store query itself failed
    DataStore(StoreError),
    /// The query succeeded but matched zero readings
    NoData,
}

impl ReportError {
    /// Stable code for API clients; lets the UI tell "no data" from failures
    pub fn code(&self) -> &'static str {
        match self {
            ReportError::Validation(_) | ReportError::InvalidRange { .. } => "VALIDATION",
            ReportError::DataStore(_) => "DATA_STORE",
            ReportError::NoData => "NO_DATA",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReportError::Validation(_) | ReportError::InvalidRange { .. }
        )
    }
}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        ReportError::DataStore(err)
    }
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Validation(msg) => write!(f, "{}", msg),
            ReportError::InvalidRange { start, end } => {
                write!(f, "Invalid date range: endDate {} is before startDate {}", end, start)
            }
            ReportError::DataStore(e) => write!(f, "{}", e),
            ReportError::NoData => write!(f, "No data found"),
        }
    }
}

impl std::error::Error for ReportError {}
