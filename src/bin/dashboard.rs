//! Dashboard Binary - Report API and Live Feed
//!
//! Serves daily/range reports over the SQLite reading store and keeps a live
//! window of newly inserted readings.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin dashboard
//! ```
//!
//! ## Environment Variables
//!
//! - SENSOR_DB_PATH - SQLite database path (default: data/sensorboard.db)
//! - HTTP_BIND_ADDR - Listen address (default: 127.0.0.1:3000)
//! - UTC_OFFSET_MINUTES - Fixed local offset for report dates (default: -300)
//! - LIVE_WINDOW_SIZE - Readings kept by the live feed (default: 50)
//! - FEED_POLL_INTERVAL_MS - New-row poll interval (default: 1000)
//! - MAX_RANGE_DAYS - Longest accepted range report (default: 366)
//! - FEED_RECONNECT_INITIAL_SECS / FEED_RECONNECT_MAX_SECS / FEED_RECONNECT_MAX_RETRIES
//! - RUST_LOG - Logging level (optional, default: info)

use sensorboard::config::DashboardConfig;
use sensorboard::live_feed::LiveFeedAdapter;
use sensorboard::report_core::ReportService;
use sensorboard::store::{FeedHub, SqliteFeedPoller, SqliteReadingStore};
use sensorboard::web::{router, AppState};
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = DashboardConfig::from_env()?;
    let offset = config
        .offset()
        .ok_or_else(|| format!("invalid UTC offset: {} minutes", config.utc_offset_minutes))?;

    log::info!("🚀 Starting Sensor Dashboard");
    log::info!("   Database: {}", config.db_path);
    log::info!("   Listen: {}", config.bind_addr);
    log::info!("   Live window: {}", config.live_window);
    log::info!("   Max range: {} days", config.max_range_days);

    let store = SqliteReadingStore::open(&config.db_path)?;
    let hub = Arc::new(FeedHub::new());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = SqliteFeedPoller::new(store.clone(), hub.clone(), config.feed_poll_interval())?;
    let poller_task = tokio::spawn(poller.run(shutdown_rx));

    let history: Arc<SqliteReadingStore> = Arc::new(store.clone());
    let live = LiveFeedAdapter::new(hub.clone(), config.live_feed())
        .with_history(history)
        .spawn();

    let reports = ReportService::new(Arc::new(store), offset)
        .with_max_range_days(config.max_range_days);
    log::info!("📊 Report dates are local to UTC{}", reports.offset());
    let app = router(AppState::new(Arc::new(reports), live.snapshots()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("✅ Dashboard listening on http://{}", listener.local_addr()?);
    log::info!("🔄 Press CTRL+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => log::info!("⚠️  Received CTRL+C, shutting down..."),
                Err(err) => log::error!("❌ Failed to listen for CTRL+C: {}", err),
            }
        })
        .await?;

    if let Err(e) = live.shutdown().await {
        log::warn!("⚠️  Live feed ended early: {}", e);
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = poller_task.await {
        log::error!("❌ Feed poller task failed: {}", e);
    }

    log::info!("✅ Dashboard stopped");
    Ok(())
}
