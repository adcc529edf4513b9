//! Live feed: bounded newest-first window over insert notifications
//!
//! # Architecture
//!
//! ```text
//! ReadingFeed::subscribe → SubscriptionGuard → mpsc → LiveWindow
//!     ↓
//! watch::Sender<Arc<LiveSnapshot>> → /api/live
//! ```

pub mod adapter;
pub mod backoff;
pub mod error;
pub mod subscription;
pub mod window;

pub use adapter::{LiveFeedAdapter, LiveFeedConfig, LiveFeedHandle};
pub use backoff::{ExponentialBackoff, MaxRetriesExceeded};
pub use error::FeedError;
pub use subscription::SubscriptionGuard;
pub use window::{CurrentReading, FeedState, LiveSnapshot, LiveWindow, DEFAULT_LIVE_WINDOW};
