use super::backoff::MaxRetriesExceeded;
use crate::store::StoreError;

#[derive(Debug)]
pub enum FeedError {
    /// The feed refused the subscription
    Subscribe(StoreError),
    /// Reconnecting gave up; the session ended in `Disconnected`
    MaxRetriesExceeded,
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Subscribe(e) => write!(f, "Live feed subscribe failed: {}", e),
            FeedError::MaxRetriesExceeded => write!(f, "Live feed reconnect attempts exhausted"),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<StoreError> for FeedError {
    fn from(err: StoreError) -> Self {
        FeedError::Subscribe(err)
    }
}

impl From<MaxRetriesExceeded> for FeedError {
    fn from(_: MaxRetriesExceeded) -> Self {
        FeedError::MaxRetriesExceeded
    }
}
