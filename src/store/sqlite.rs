//! SQLite-backed record store.
//!
//! Targets the application's user table:
//!
//!   id INTEGER PRIMARY KEY, email TEXT, totp_secret TEXT,
//!   totp_backup_codes TEXT, updated_at TEXT
//!
//! Only rows with at least one TOTP field present are fetched as
//! candidates.

use std::path::Path;

use rusqlite::Connection;

use crate::errors::{OtpVaultError, Result};
use crate::store::{CandidateRecord, EncryptedUpdate, RecordStore};

/// Default table holding the TOTP columns.
pub const DEFAULT_TABLE: &str = "users";

/// SQLite-backed [`RecordStore`] over the application database.
pub struct SqliteStore {
    conn: Connection,
    table: String,
}

impl SqliteStore {
    /// Open the application database at `path`.
    ///
    /// Fails if the file does not exist: `Connection::open` would
    /// silently create an empty database, and a migration that
    /// "succeeds" against an accidental empty file must not happen.
    pub fn open(path: &Path, table: &str) -> Result<Self> {
        validate_table_name(table)?;

        if !path.exists() {
            return Err(OtpVaultError::Store(format!(
                "database not found at {}",
                path.display()
            )));
        }

        let conn = Connection::open(path)
            .map_err(|e| OtpVaultError::Store(format!("open {}: {e}", path.display())))?;

        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }
}

impl RecordStore for SqliteStore {
    fn fetch_candidates(&self) -> Result<Vec<CandidateRecord>> {
        let sql = format!(
            "SELECT id, email, totp_secret, totp_backup_codes
             FROM {}
             WHERE totp_secret IS NOT NULL OR totp_backup_codes IS NOT NULL
             ORDER BY id",
            self.table
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| OtpVaultError::Store(format!("candidate query prepare: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(CandidateRecord {
                    id: row.get(0)?,
                    identifier: row.get(1)?,
                    secret: row.get(2)?,
                    backup_codes: row.get(3)?,
                })
            })
            .map_err(|e| OtpVaultError::Store(format!("candidate query exec: {e}")))?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row.map_err(|e| OtpVaultError::Store(format!("row parse: {e}")))?);
        }

        Ok(candidates)
    }

    fn write_back(&mut self, update: &EncryptedUpdate) -> Result<()> {
        let sql = format!(
            "UPDATE {} SET totp_secret = ?1, totp_backup_codes = ?2, updated_at = ?3
             WHERE id = ?4",
            self.table
        );

        let changed = self
            .conn
            .execute(
                &sql,
                rusqlite::params![
                    update.secret,
                    update.backup_codes,
                    update.updated_at.to_rfc3339(),
                    update.id,
                ],
            )
            .map_err(|e| OtpVaultError::Store(format!("update id={}: {e}", update.id)))?;

        if changed != 1 {
            return Err(OtpVaultError::Store(format!(
                "update id={} touched {changed} rows, expected 1",
                update.id
            )));
        }

        Ok(())
    }
}

/// Validate a table name before it is interpolated into a query.
///
/// The name comes from the CLI and cannot be bound as a statement
/// parameter, so it is restricted to `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !(valid_start && valid_rest) {
        return Err(OtpVaultError::Store(format!(
            "invalid table name '{table}' — use letters, digits and underscores only"
        )));
    }

    Ok(())
}
