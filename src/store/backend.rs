//! Data store collaborator interfaces
//!
//! `ReadingStore` is the query side consumed by the report service,
//! `ReadingFeed` the subscription side consumed by the live feed adapter.

use crate::report_core::Reading;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub enum StoreError {
    Database(String),
    InvalidRow(String),
    /// The feed no longer accepts subscriptions
    Closed,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::InvalidRow(e) => write!(f, "Invalid row: {}", e),
            StoreError::Closed => write!(f, "Feed closed"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Query interface over stored readings
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Readings with `start <= time <= end`, ascending by time
    async fn query_readings(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, StoreError>;

    /// Most recent `limit` readings with their row ids, newest first
    async fn latest_readings(&self, limit: usize) -> Result<Vec<StoredReading>, StoreError>;

    /// Append a reading (ingestion path)
    async fn insert_reading(&self, reading: &Reading) -> Result<(), StoreError>;
}

/// A reading together with the id of the row it was stored in.
///
/// Equal readings inserted twice are two rows with distinct ids.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
    pub id: i64,
    pub reading: Reading,
}

impl StoredReading {
    pub fn new(id: i64, reading: Reading) -> Self {
        Self { id, reading }
    }
}

/// Callback invoked once per inserted row
pub type InsertCallback = Box<dyn Fn(StoredReading) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// Push interface for newly inserted readings
pub trait ReadingFeed: Send + Sync {
    fn subscribe(&self, on_insert: InsertCallback) -> Result<SubscriptionHandle, StoreError>;

    /// Unknown or already released handles are ignored
    fn unsubscribe(&self, handle: SubscriptionHandle);
}
