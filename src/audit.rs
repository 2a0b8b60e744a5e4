//! Run history — SQLite-based record of past migration runs.
//!
//! Stores one row per completed real run (dry runs are not recorded)
//! in an `otpvault_runs` table inside the same database the migration
//! ran against.
//!
//! Designed for graceful degradation: if the table can't be created or
//! written to, the run continues without history.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{OtpVaultError, Result};
use crate::migrate::MigrationSummary;

/// A single recorded run.
#[derive(Debug, Clone)]
pub struct RunEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub total: i64,
    pub migrated: i64,
    pub skipped: i64,
    pub failed: i64,
}

/// SQLite-backed run history.
pub struct MigrationLog {
    conn: Connection,
}

impl MigrationLog {
    /// Open (or create) the history table in the database at `db_path`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "history unavailable" and continue normally.
    pub fn open(db_path: &Path) -> Option<Self> {
        let conn = Connection::open(db_path).ok()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS otpvault_runs (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                total     INTEGER NOT NULL,
                migrated  INTEGER NOT NULL,
                skipped   INTEGER NOT NULL,
                failed    INTEGER NOT NULL
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record a completed run. Fire-and-forget — errors are silently ignored.
    pub fn record(&self, summary: &MigrationSummary) {
        let now = Utc::now().to_rfc3339();
        let total = i64::try_from(summary.total).unwrap_or(i64::MAX);
        let migrated = i64::try_from(summary.migrated).unwrap_or(i64::MAX);
        let skipped = i64::try_from(summary.skipped).unwrap_or(i64::MAX);
        let failed = i64::try_from(summary.failed).unwrap_or(i64::MAX);

        let _ = self.conn.execute(
            "INSERT INTO otpvault_runs (timestamp, total, migrated, skipped, failed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, total, migrated, skipped, failed],
        );
    }

    /// Query recent runs, most recent first.
    pub fn recent(&self, limit: usize) -> Result<Vec<RunEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, total, migrated, skipped, failed
                 FROM otpvault_runs
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(|e| OtpVaultError::Store(format!("history query prepare: {e}")))?;

        let rows = stmt
            .query_map([limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(RunEntry {
                    id: row.get(0)?,
                    timestamp,
                    total: row.get(2)?,
                    migrated: row.get(3)?,
                    skipped: row.get(4)?,
                    failed: row.get(5)?,
                })
            })
            .map_err(|e| OtpVaultError::Store(format!("history query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| OtpVaultError::Store(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }
}

/// Convenience helper: record a run in the given database.
///
/// Opens the history table, records the summary, and silently ignores
/// any errors.  Safe to call after any run — it never fails the parent
/// operation.
pub fn record_run(db_path: &Path, summary: &MigrationSummary) {
    if let Some(log) = MigrationLog::open(db_path) {
        log.record(summary);
    }
}
