//! SQLite-backed reading store
//!
//! Readings live in the `sensor_data` table (schema in `sql/`). Queries are
//! short and run under a shared connection mutex.

use super::backend::{ReadingStore, StoreError, StoredReading};
use crate::report_core::reading::format_instant;
use crate::report_core::Reading;
use crate::sqlite_pragma::apply_optimized_pragmas;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA_SQL: &str = include_str!("../../sql/00_sensor_data.sql");

/// Rows handed to the feed poller per cursor read
pub const CURSOR_BATCH_LIMIT: usize = 1000;

/// One cursor read: parsed rows plus how far the cursor may advance
#[derive(Debug, Default)]
pub struct CursorBatch {
    pub readings: Vec<StoredReading>,
    /// Highest id read, including skipped rows
    pub last_id: Option<i64>,
    pub skipped: usize,
}

#[derive(Clone)]
pub struct SqliteReadingStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReadingStore {
    /// Open (or create) the database and make sure the schema exists
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Database(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(db_path)?;
        apply_optimized_pragmas(&conn)?;
        conn.execute_batch(SCHEMA_SQL)?;

        log::info!("🗄️  Reading store opened: {}", db_path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory store, used by tests and demos
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection mutex poisoned".to_string()))
    }

    /// Highest row id currently stored (0 when empty)
    pub fn max_id(&self) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        let id = conn.query_row("SELECT COALESCE(MAX(id), 0) FROM sensor_data", [], |row| {
            row.get(0)
        })?;
        Ok(id)
    }

    /// Rows with `id > after_id`, ascending by id, at most `CURSOR_BATCH_LIMIT`.
    ///
    /// Rows whose timestamp does not parse are skipped with a warning; the
    /// batch's `last_id` still moves past them.
    pub fn read_after(&self, after_id: i64) -> Result<CursorBatch, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, time, temperature, humidity
             FROM sensor_data
             WHERE id > ?1
             ORDER BY id ASC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![after_id, CURSOR_BATCH_LIMIT as i64], |row| {
            Ok((row.get::<_, i64>(0)?, raw_reading(row, 1)?))
        })?;

        let mut batch = CursorBatch::default();
        for row in rows {
            let (id, raw) = row?;
            batch.last_id = Some(id);
            match raw.into_reading() {
                Ok(reading) => batch.readings.push(StoredReading::new(id, reading)),
                Err(e) => {
                    log::warn!("⚠️  Skipping row id={}: {}", id, e);
                    batch.skipped += 1;
                }
            }
        }
        Ok(batch)
    }

    /// Insert a row with `time` exactly as given, as an external writer would
    #[cfg(test)]
    pub(crate) fn insert_raw(
        &self,
        time: &str,
        temperature: f64,
        humidity: f64,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sensor_data (time, temperature, humidity) VALUES (?1, ?2, ?3)",
            params![time, temperature, humidity],
        )?;
        Ok(())
    }

    /// Batch insert in one transaction
    pub fn insert_many(&self, readings: &[Reading]) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sensor_data (time, temperature, humidity) VALUES (?1, ?2, ?3)",
            )?;
            for reading in readings {
                stmt.execute(params![reading.time_key(), reading.temperature, reading.humidity])?;
            }
        }
        tx.commit()?;
        Ok(readings.len())
    }
}

/// Row as stored, before timestamp parsing
struct RawReading {
    time: String,
    temperature: f64,
    humidity: f64,
}

impl RawReading {
    fn into_reading(self) -> Result<Reading, StoreError> {
        let time = DateTime::parse_from_rfc3339(&self.time)
            .map_err(|e| StoreError::InvalidRow(format!("bad time '{}': {}", self.time, e)))?
            .with_timezone(&Utc);
        Ok(Reading::new(time, self.temperature, self.humidity))
    }
}

fn raw_reading(row: &Row<'_>, first: usize) -> rusqlite::Result<RawReading> {
    Ok(RawReading {
        time: row.get(first)?,
        temperature: row.get(first + 1)?,
        humidity: row.get(first + 2)?,
    })
}

#[async_trait]
impl ReadingStore for SqliteReadingStore {
    async fn query_readings(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Reading>, StoreError> {
        let (start_key, end_key) = (format_instant(&start), format_instant(&end));

        // julianday() compares instants, whatever RFC 3339 shape the row was written in
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT time, temperature, humidity
             FROM sensor_data
             WHERE julianday(time) BETWEEN julianday(?1) AND julianday(?2)
             ORDER BY julianday(time) ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![start_key, end_key], |row| raw_reading(row, 0))?;

        let mut readings = Vec::new();
        for row in rows {
            readings.push(row?.into_reading()?);
        }

        log::debug!(
            "🔎 Queried {} readings in [{}, {}]",
            readings.len(),
            start_key,
            end_key
        );
        Ok(readings)
    }

    async fn latest_readings(&self, limit: usize) -> Result<Vec<StoredReading>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, time, temperature, humidity
             FROM sensor_data
             ORDER BY julianday(time) DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((row.get::<_, i64>(0)?, raw_reading(row, 1)?))
        })?;

        let mut readings = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            match raw.into_reading() {
                Ok(reading) => readings.push(StoredReading::new(id, reading)),
                Err(e) => log::warn!("⚠️  Skipping row id={} in latest readings: {}", id, e),
            }
        }
        Ok(readings)
    }

    async fn insert_reading(&self, reading: &Reading) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sensor_data (time, temperature, humidity) VALUES (?1, ?2, ?3)",
            params![reading.time_key(), reading.temperature, reading.humidity],
        )?;
        Ok(())
    }
}
