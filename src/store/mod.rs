//! Data store collaborator: reading queries and insert notifications
//!
//! # Architecture
//!
//! ```text
//! sensor_data (SQLite) → SqliteReadingStore → ReportService
//!     ↓
//! SqliteFeedPoller (id cursor) → FeedHub → LiveFeedAdapter
//! ```

pub mod backend;
pub mod feed_hub;
pub mod sqlite_feed;
pub mod sqlite_store;
pub mod synthetic;

pub use backend::{
    InsertCallback, ReadingFeed, ReadingStore, StoreError, StoredReading, SubscriptionHandle,
};
pub use feed_hub::FeedHub;
pub use sqlite_feed::SqliteFeedPoller;
pub use sqlite_store::{CursorBatch, SqliteReadingStore};
