use crate::store::{InsertCallback, ReadingFeed, StoreError, SubscriptionHandle};
use std::sync::Arc;

/// Subscription released on drop, whichever way the owning scope exits
pub struct SubscriptionGuard {
    feed: Arc<dyn ReadingFeed>,
    handle: SubscriptionHandle,
}

impl SubscriptionGuard {
    pub fn acquire(
        feed: Arc<dyn ReadingFeed>,
        on_insert: InsertCallback,
    ) -> Result<Self, StoreError> {
        let handle = feed.subscribe(on_insert)?;
        Ok(Self { feed, handle })
    }

    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.feed.unsubscribe(self.handle);
    }
}
