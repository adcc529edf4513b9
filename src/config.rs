use crate::live_feed::{LiveFeedConfig, DEFAULT_LIVE_WINDOW};
use crate::report_core::service::{DEFAULT_MAX_RANGE_DAYS, DEFAULT_UTC_OFFSET_MINUTES};
use chrono::FixedOffset;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Path to SQLite database file
    pub db_path: String,

    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Fixed local offset in minutes east of UTC (no daylight saving)
    pub utc_offset_minutes: i32,

    /// Number of readings kept by the live feed
    pub live_window: usize,

    /// How often the SQLite feed poller looks for new rows
    pub feed_poll_interval_ms: u64,

    /// Longest accepted range report, in days
    pub max_range_days: i64,

    pub reconnect_initial_secs: u64,
    pub reconnect_max_secs: u64,
    pub reconnect_max_retries: u32,
}

impl DashboardConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SENSOR_DB_PATH` (default: data/sensorboard.db)
    /// - `HTTP_BIND_ADDR` (default: 127.0.0.1:3000)
    /// - `UTC_OFFSET_MINUTES` (default: -300, i.e. UTC-5)
    /// - `LIVE_WINDOW_SIZE` (default: 50)
    /// - `FEED_POLL_INTERVAL_MS` (default: 1000)
    /// - `MAX_RANGE_DAYS` (default: 366)
    /// - `FEED_RECONNECT_INITIAL_SECS` (default: 1)
    /// - `FEED_RECONNECT_MAX_SECS` (default: 30)
    /// - `FEED_RECONNECT_MAX_RETRIES` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            db_path: env::var("SENSOR_DB_PATH")
                .unwrap_or_else(|_| "data/sensorboard.db".to_string()),

            bind_addr: parse_var("HTTP_BIND_ADDR", "127.0.0.1:3000".parse().map_err(|_| {
                ConfigError::InvalidValue("default bind address".to_string())
            })?)?,

            utc_offset_minutes: parse_var("UTC_OFFSET_MINUTES", DEFAULT_UTC_OFFSET_MINUTES)?,

            live_window: parse_var("LIVE_WINDOW_SIZE", DEFAULT_LIVE_WINDOW)?,

            feed_poll_interval_ms: parse_var("FEED_POLL_INTERVAL_MS", 1_000)?,

            max_range_days: parse_var("MAX_RANGE_DAYS", DEFAULT_MAX_RANGE_DAYS)?,

            reconnect_initial_secs: parse_var("FEED_RECONNECT_INITIAL_SECS", 1)?,
            reconnect_max_secs: parse_var("FEED_RECONNECT_MAX_SECS", 30)?,
            reconnect_max_retries: parse_var("FEED_RECONNECT_MAX_RETRIES", 10)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.offset().is_none() {
            return Err(ConfigError::InvalidValue(format!(
                "UTC_OFFSET_MINUTES must be within ±1439, got {}",
                self.utc_offset_minutes
            )));
        }

        if self.live_window == 0 {
            return Err(ConfigError::InvalidValue(
                "LIVE_WINDOW_SIZE must be at least 1".to_string(),
            ));
        }

        if self.max_range_days < 1 {
            return Err(ConfigError::InvalidValue(
                "MAX_RANGE_DAYS must be at least 1".to_string(),
            ));
        }

        if self.db_path.trim().is_empty() {
            return Err(ConfigError::MissingVariable("SENSOR_DB_PATH".to_string()));
        }

        Ok(())
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        crate::report_core::offset_from_minutes(self.utc_offset_minutes)
    }

    pub fn feed_poll_interval(&self) -> Duration {
        Duration::from_millis(self.feed_poll_interval_ms.max(1))
    }

    pub fn live_feed(&self) -> LiveFeedConfig {
        LiveFeedConfig {
            capacity: self.live_window,
            reconnect_initial: Duration::from_secs(self.reconnect_initial_secs),
            reconnect_max: Duration::from_secs(self.reconnect_max_secs),
            max_retries: self.reconnect_max_retries,
        }
    }
}

/// Parse an optional variable; a set but unparsable value is an error, not a silent default
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::InvalidValue(format!("{}='{}' could not be parsed", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
