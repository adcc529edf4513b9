//! In-memory fan-out of insert notifications
//!
//! Publishers (the SQLite poller, or a test) call `publish`; every live
//! subscription callback receives the reading. Closing the hub drops all
//! callbacks, which is how subscribers observe a lost feed.

use super::backend::{InsertCallback, ReadingFeed, StoreError, StoredReading, SubscriptionHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

pub struct FeedHub {
    subscribers: Mutex<HubState>,
    next_id: AtomicU64,
}

struct HubState {
    callbacks: HashMap<u64, InsertCallback>,
    closed: bool,
}

impl FeedHub {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HubState {
                callbacks: HashMap::new(),
                closed: false,
            }),
            next_id: AtomicU64::new(1),
        }
    }

    fn state(&self) -> MutexGuard<'_, HubState> {
        // A panicking callback must not wedge the hub
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Deliver a reading to every subscriber. Returns the number notified.
    ///
    /// Callbacks run under the hub lock and must not call back into the hub.
    pub fn publish(&self, reading: &StoredReading) -> usize {
        let state = self.state();
        for callback in state.callbacks.values() {
            callback(reading.clone());
        }
        state.callbacks.len()
    }

    /// Drop every subscription and refuse new ones
    pub fn close(&self) {
        let mut state = self.state();
        state.closed = true;
        let dropped = state.callbacks.len();
        state.callbacks.clear();
        log::info!("🔌 Feed hub closed ({} subscriptions dropped)", dropped);
    }

    /// Drop every subscription but keep accepting new ones
    pub fn disconnect_all(&self) {
        let mut state = self.state();
        state.callbacks.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.state().callbacks.len()
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingFeed for FeedHub {
    fn subscribe(&self, on_insert: InsertCallback) -> Result<SubscriptionHandle, StoreError> {
        let mut state = self.state();
        if state.closed {
            return Err(StoreError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        state.callbacks.insert(id, on_insert);
        log::debug!("📡 Subscription {} registered", id);
        Ok(SubscriptionHandle(id))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        if self.state().callbacks.remove(&handle.0).is_some() {
            log::debug!("📡 Subscription {} released", handle.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report_core::Reading;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn sample() -> StoredReading {
        StoredReading::new(
            1,
            Reading::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 20.0, 50.0),
        )
    }

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let hub = FeedHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let seen = seen.clone();
            hub.subscribe(Box::new(move |r: StoredReading| seen.lock().unwrap().push(r)))
                .unwrap();
        }

        assert_eq!(hub.publish(&sample()), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let hub = FeedHub::new();
        let seen = Arc::new(Mutex::new(0usize));
        let seen_cb = seen.clone();

        let handle = hub
            .subscribe(Box::new(move |_: StoredReading| *seen_cb.lock().unwrap() += 1))
            .unwrap();
        hub.publish(&sample());
        hub.unsubscribe(handle);
        hub.unsubscribe(handle);
        hub.publish(&sample());

        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_closed_hub_rejects_subscriptions() {
        let hub = FeedHub::new();
        hub.subscribe(Box::new(|_: StoredReading| {})).unwrap();
        hub.close();

        assert_eq!(hub.subscriber_count(), 0);
        assert!(matches!(
            hub.subscribe(Box::new(|_: StoredReading| {})),
            Err(StoreError::Closed)
        ));
    }
}
