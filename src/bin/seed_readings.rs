//! Seed Readings - synthetic sensor data for local development
//!
//! Backfills the last N days of readings, then optionally keeps inserting one
//! reading every few seconds so the dashboard's live feed has something to show.
//! `--import` loads readings from a JSON lines file instead of generating them.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin seed_readings -- --days 7 --interval 15
//! cargo run --bin seed_readings -- --days 1 --follow
//! cargo run --bin seed_readings -- --import readings.jsonl
//! ```
//!
//! ## Environment Variables
//!
//! - SENSOR_DB_PATH - SQLite database path (default: data/sensorboard.db)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sensorboard::config::DashboardConfig;
use sensorboard::report_core::Reading;
use sensorboard::store::synthetic::{generate_readings, random_reading};
use sensorboard::store::{ReadingStore, SqliteReadingStore};
use std::env;
use std::path::{Path, PathBuf};
use tokio::time::{interval, Duration};

const FOLLOW_INTERVAL_SECS: u64 = 3;

struct SeedArgs {
    days: i64,
    interval_minutes: i64,
    follow: bool,
    import: Option<PathBuf>,
}

fn parse_args() -> SeedArgs {
    let args: Vec<String> = env::args().collect();

    let value_after = |flag: &str| -> Option<&String> {
        let idx = args.iter().position(|x| x == flag)?;
        args.get(idx + 1)
    };
    let number_after = |flag: &str| -> Option<i64> { value_after(flag)?.parse().ok() };

    SeedArgs {
        days: number_after("--days").unwrap_or(7).max(0),
        interval_minutes: number_after("--interval").unwrap_or(15).max(1),
        follow: args.contains(&"--follow".to_string()),
        import: value_after("--import").map(PathBuf::from),
    }
}

/// Parse one reading per line; malformed lines are logged and skipped
fn load_jsonl(path: &Path) -> Result<Vec<Reading>, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let mut readings = Vec::new();

    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match Reading::from_json(line) {
            Ok(reading) => readings.push(reading),
            Err(e) => log::warn!("⚠️  {}:{} skipped: {}", path.display(), line_no + 1, e),
        }
    }

    Ok(readings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let args = parse_args();
    let config = DashboardConfig::from_env()?;

    log::info!("🌱 Seeding readings");
    log::info!("   Database: {}", config.db_path);

    let store = SqliteReadingStore::open(&config.db_path)?;
    let mut rng = StdRng::from_entropy();

    let readings = match &args.import {
        Some(path) => {
            log::info!("   Import: {}", path.display());
            load_jsonl(path)?
        }
        None => {
            log::info!(
                "   History: {} days every {} min",
                args.days,
                args.interval_minutes
            );
            let end = Utc::now();
            let start = end - ChronoDuration::days(args.days);
            generate_readings(&mut rng, start, end, args.interval_minutes)
        }
    };
    let inserted = store.insert_many(&readings)?;
    log::info!("✅ Inserted {} readings", inserted);

    if !args.follow {
        return Ok(());
    }

    log::info!(
        "📡 Following: one reading every {}s (CTRL+C to stop)",
        FOLLOW_INTERVAL_SECS
    );
    let mut ticker = interval(Duration::from_secs(FOLLOW_INTERVAL_SECS));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let reading = random_reading(&mut rng, Utc::now());
                match store.insert_reading(&reading).await {
                    Ok(()) => log::info!(
                        "🌡️  {:.1}°C {:.1}% at {}",
                        reading.temperature,
                        reading.humidity,
                        reading.time_key()
                    ),
                    Err(e) => log::error!("❌ Insert failed: {}", e),
                }
            }
            _ = &mut ctrl_c => {
                log::info!("⚠️  Received CTRL+C, stopping");
                break;
            }
        }
    }

    Ok(())
}
