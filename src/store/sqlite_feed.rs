//! Insert notifications for the SQLite store
//!
//! SQLite has no change stream, so new rows are discovered with an id cursor
//! (initialized from MAX(id)) and fanned out through a `FeedHub`.

use super::backend::StoreError;
use super::feed_hub::FeedHub;
use super::sqlite_store::SqliteReadingStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;

pub struct SqliteFeedPoller {
    store: SqliteReadingStore,
    hub: Arc<FeedHub>,
    last_read_id: i64,
    poll_interval: Duration,
}

impl SqliteFeedPoller {
    /// Start from the current end of the table: only rows inserted from now on are published
    pub fn new(
        store: SqliteReadingStore,
        hub: Arc<FeedHub>,
        poll_interval: Duration,
    ) -> Result<Self, StoreError> {
        let last_id = store.max_id()?;
        log::info!("📥 Feed poller initialized: starting from cursor id={}", last_id);

        Ok(Self {
            store,
            hub,
            last_read_id: last_id,
            poll_interval,
        })
    }

    /// Publish rows inserted since the last poll. Returns how many were published.
    ///
    /// Unparsable rows are skipped and the cursor moves past them; only a
    /// database error is returned.
    pub fn poll_once(&mut self) -> Result<usize, StoreError> {
        let batch = self.store.read_after(self.last_read_id)?;

        for stored in &batch.readings {
            self.hub.publish(stored);
        }
        if let Some(last_id) = batch.last_id {
            self.last_read_id = self.last_read_id.max(last_id);
        }

        if batch.last_id.is_some() {
            log::debug!(
                "📥 Published {} new readings ({} skipped), cursor updated to id={}",
                batch.readings.len(),
                batch.skipped,
                self.last_read_id
            );
        }
        Ok(batch.readings.len())
    }

    pub fn cursor_position(&self) -> i64 {
        self.last_read_id
    }

    /// Poll until `shutdown` flips to true, then close the hub.
    ///
    /// A failed poll (database error) drops current subscriptions so
    /// subscribers notice the lost feed and resubscribe.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.poll_interval);
        log::info!("✅ Feed poller running (every {:?})", self.poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once() {
                        log::error!("❌ Feed poll failed: {}", e);
                        self.hub.disconnect_all();
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.hub.close();
        log::info!("Feed poller stopped at cursor id={}", self.last_read_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report_core::Reading;
    use crate::store::backend::{ReadingFeed, StoredReading};
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn reading(minute: u32, temperature: f64) -> Reading {
        Reading::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap(),
            temperature,
            50.0,
        )
    }

    #[test]
    fn test_poller_publishes_only_new_rows() {
        let store = SqliteReadingStore::in_memory().unwrap();
        store.insert_many(&[reading(0, 1.0), reading(1, 2.0)]).unwrap();

        let hub = Arc::new(FeedHub::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = seen.clone();
        hub.subscribe(Box::new(move |r: StoredReading| {
            seen_cb.lock().unwrap().push(r.reading.temperature)
        }))
        .unwrap();

        let mut poller =
            SqliteFeedPoller::new(store.clone(), hub.clone(), Duration::from_millis(10)).unwrap();
        assert_eq!(poller.cursor_position(), 2);
        assert_eq!(poller.poll_once().unwrap(), 0);

        store.insert_many(&[reading(2, 3.0), reading(3, 4.0)]).unwrap();
        assert_eq!(poller.poll_once().unwrap(), 2);
        assert_eq!(poller.cursor_position(), 4);
        assert_eq!(*seen.lock().unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_unparsable_row_is_skipped_and_cursor_advances() {
        let store = SqliteReadingStore::in_memory().unwrap();
        let hub = Arc::new(FeedHub::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = seen.clone();
        hub.subscribe(Box::new(move |r: StoredReading| seen_cb.lock().unwrap().push(r.id)))
            .unwrap();

        let mut poller =
            SqliteFeedPoller::new(store.clone(), hub.clone(), Duration::from_millis(10)).unwrap();

        store.insert_raw("2024-01-01 12:00:00", 1.0, 1.0).unwrap();
        store.insert_many(&[reading(5, 21.0)]).unwrap();

        assert_eq!(poller.poll_once().unwrap(), 1);
        assert_eq!(poller.cursor_position(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![2]);

        // The bad row is not read again and subscribers stay connected
        assert_eq!(poller.poll_once().unwrap(), 0);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_run_closes_hub_on_shutdown() {
        let store = SqliteReadingStore::in_memory().unwrap();
        let hub = Arc::new(FeedHub::new());
        let poller = SqliteFeedPoller::new(store, hub.clone(), Duration::from_millis(5)).unwrap();

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(poller.run(rx));
        tx.send(true).unwrap();
        task.await.unwrap();

        assert!(hub.subscribe(Box::new(|_: StoredReading| {})).is_err());
    }
}
