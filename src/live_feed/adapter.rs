//! Live feed adapter
//!
//! Owns one subscription to a `ReadingFeed` for as long as its handle lives.
//!
//! ```text
//! Disconnected → Subscribing → Streaming → Disconnected (teardown)
//!                    ↑             │
//!                    └── backoff ──┘ (feed lost)
//! ```
//!
//! Every change publishes a fresh `Arc<LiveSnapshot>` through a watch channel.

use super::backoff::ExponentialBackoff;
use super::error::FeedError;
use super::subscription::SubscriptionGuard;
use super::window::{FeedState, LiveSnapshot, LiveWindow, DEFAULT_LIVE_WINDOW};
use crate::store::{ReadingFeed, ReadingStore, StoredReading};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct LiveFeedConfig {
    pub capacity: usize,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
    pub max_retries: u32,
}

impl Default for LiveFeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LIVE_WINDOW,
            reconnect_initial: Duration::from_secs(1),
            reconnect_max: Duration::from_secs(30),
            max_retries: 10,
        }
    }
}

pub struct LiveFeedAdapter {
    feed: Arc<dyn ReadingFeed>,
    history: Option<Arc<dyn ReadingStore>>,
    config: LiveFeedConfig,
    snapshot_tx: watch::Sender<Arc<LiveSnapshot>>,
}

/// Why a streaming session ended
enum SessionEnd {
    Teardown,
    FeedLost,
}

impl LiveFeedAdapter {
    pub fn new(feed: Arc<dyn ReadingFeed>, config: LiveFeedConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(LiveSnapshot::default()));
        Self {
            feed,
            history: None,
            config,
            snapshot_tx,
        }
    }

    /// Backfill the window from the store on every (re)subscription
    pub fn with_history(mut self, store: Arc<dyn ReadingStore>) -> Self {
        self.history = Some(store);
        self
    }

    pub fn snapshots(&self) -> watch::Receiver<Arc<LiveSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Start the session. Dropping the returned handle tears it down.
    pub fn spawn(self) -> LiveFeedHandle {
        let snapshots = self.snapshots();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown_rx));

        LiveFeedHandle {
            snapshots,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    fn publish(&self, window: &LiveWindow, state: FeedState) {
        self.snapshot_tx.send_replace(Arc::new(window.snapshot(state)));
    }

    async fn run(self, mut shutdown: oneshot::Receiver<()>) -> Result<(), FeedError> {
        let mut window = LiveWindow::new(self.config.capacity);

        log::info!("📡 Live feed starting (window: {})", self.config.capacity);

        let result = self.session(&mut window, &mut shutdown).await;
        if let Err(e) = &result {
            log::error!("❌ {}", e);
        }

        self.publish(&window, FeedState::Disconnected);
        log::info!("Live feed stopped");
        result
    }

    async fn session(
        &self,
        window: &mut LiveWindow,
        shutdown: &mut oneshot::Receiver<()>,
    ) -> Result<(), FeedError> {
        let mut backoff = ExponentialBackoff::new(
            self.config.reconnect_initial,
            self.config.reconnect_max,
            self.config.max_retries,
        );

        loop {
            self.publish(window, FeedState::Subscribing);

            let (tx, rx) = mpsc::unbounded_channel::<StoredReading>();
            let on_insert = Box::new(move |stored: StoredReading| {
                let _ = tx.send(stored);
            });

            match SubscriptionGuard::acquire(self.feed.clone(), on_insert) {
                Ok(guard) => {
                    log::info!("✅ Live feed subscribed (handle {})", guard.handle().0);
                    backoff.reset();

                    self.backfill(window).await;
                    self.publish(window, FeedState::Streaming);

                    let end = self.stream(window, rx, shutdown).await;
                    drop(guard);

                    match end {
                        SessionEnd::Teardown => return Ok(()),
                        SessionEnd::FeedLost => log::warn!("⚠️  Live feed lost, resubscribing"),
                    }
                }
                Err(e) => log::error!("❌ {}", FeedError::from(e)),
            }

            self.publish(window, FeedState::Subscribing);

            tokio::select! {
                slept = backoff.sleep() => slept?,
                _ = &mut *shutdown => return Ok(()),
            }
        }
    }

    async fn backfill(&self, window: &mut LiveWindow) {
        let Some(store) = &self.history else {
            return;
        };

        match store.latest_readings(self.config.capacity).await {
            Ok(latest) => {
                log::debug!("📥 Backfilled {} readings", latest.len());
                window.replace(latest);
            }
            Err(e) => log::warn!("⚠️  Live feed backfill failed: {}", e),
        }
    }

    async fn stream(
        &self,
        window: &mut LiveWindow,
        mut rx: mpsc::UnboundedReceiver<StoredReading>,
        shutdown: &mut oneshot::Receiver<()>,
    ) -> SessionEnd {
        loop {
            tokio::select! {
                _ = &mut *shutdown => return SessionEnd::Teardown,
                received = rx.recv() => match received {
                    Some(stored) => {
                        if window.push(stored) {
                            self.publish(window, FeedState::Streaming);
                            if let Some(current) = window.snapshot(FeedState::Streaming).current {
                                log::debug!(
                                    "🌡️  {} {} at {}",
                                    current.display_temperature(),
                                    current.display_humidity(),
                                    current.time
                                );
                            }
                        }
                    }
                    // Every sender lives in the subscription callback: the feed dropped us
                    None => return SessionEnd::FeedLost,
                },
            }
        }
    }
}

/// Scoped ownership of a running live feed session
pub struct LiveFeedHandle {
    snapshots: watch::Receiver<Arc<LiveSnapshot>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), FeedError>>>,
}

impl LiveFeedHandle {
    /// Latest published snapshot
    pub fn current(&self) -> Arc<LiveSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn snapshots(&self) -> watch::Receiver<Arc<LiveSnapshot>> {
        self.snapshots.clone()
    }

    /// True once the session ended, by teardown or after exhausting reconnects
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Tear down and wait until the subscription has been released.
    /// Reports how the session ended if it stopped on its own first.
    pub async fn shutdown(mut self) -> Result<(), FeedError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => match task.await {
                Ok(result) => result,
                Err(e) => {
                    log::error!("❌ Live feed task failed: {}", e);
                    Ok(())
                }
            },
            None => Ok(()),
        }
    }
}

impl Drop for LiveFeedHandle {
    fn drop(&mut self) {
        // The task also exits when the sender is dropped unsent
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report_core::Reading;
    use crate::store::FeedHub;
    use chrono::{TimeZone, Utc};

    fn fast_config(max_retries: u32) -> LiveFeedConfig {
        LiveFeedConfig {
            capacity: 50,
            reconnect_initial: Duration::from_millis(5),
            reconnect_max: Duration::from_millis(20),
            max_retries,
        }
    }

    async fn wait_for<F>(rx: &mut watch::Receiver<Arc<LiveSnapshot>>, pred: F) -> Arc<LiveSnapshot>
    where
        F: Fn(&LiveSnapshot) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                {
                    let snapshot = rx.borrow_and_update().clone();
                    if pred(&snapshot) {
                        return snapshot;
                    }
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("snapshot condition not reached")
    }

    #[tokio::test]
    async fn test_streams_inserts_newest_first() {
        let hub = Arc::new(FeedHub::new());
        let handle = LiveFeedAdapter::new(hub.clone(), fast_config(3)).spawn();
        let mut rx = handle.snapshots();

        wait_for(&mut rx, |s| s.state == FeedState::Streaming).await;
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        hub.publish(&StoredReading::new(1, Reading::new(t0, 20.0, 50.0)));
        hub.publish(&StoredReading::new(
            2,
            Reading::new(t0 + chrono::Duration::seconds(1), 21.0, 51.0),
        ));

        let snapshot = wait_for(&mut rx, |s| s.readings.len() == 2).await;
        assert_eq!(snapshot.readings[0].temperature, 21.0);
        assert_eq!(snapshot.current.as_ref().unwrap().humidity, 51.0);

        handle.shutdown().await.unwrap();
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_gives_up_when_feed_stays_closed() {
        let hub = Arc::new(FeedHub::new());
        hub.close();

        let handle = LiveFeedAdapter::new(hub.clone(), fast_config(2)).spawn();

        tokio::time::timeout(Duration::from_secs(5), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("adapter kept retrying");

        assert_eq!(handle.current().state, FeedState::Disconnected);
        assert_eq!(hub.subscriber_count(), 0);
        assert!(matches!(
            handle.shutdown().await,
            Err(FeedError::MaxRetriesExceeded)
        ));
    }
}
