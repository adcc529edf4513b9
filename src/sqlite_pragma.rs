//! Shared SQLite connection tuning

use rusqlite::Connection;

/// Apply the PRAGMAs every connection to the readings database uses.
///
/// WAL lets the feed poller and report queries read while the ingestion
/// path writes.
pub fn apply_optimized_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "cache_size", -16_000)?;
    conn.pragma_update(None, "busy_timeout", 5_000)?;
    Ok(())
}
