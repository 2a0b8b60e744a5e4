//! Record storage behind the migration.
//!
//! The migration layer talks to storage through the [`RecordStore`]
//! trait and never learns what sits behind it.  The shipped
//! implementation is [`SqliteStore`]; tests substitute an in-memory
//! store.

use chrono::{DateTime, Utc};
use zeroize::Zeroize;

use crate::errors::Result;

pub mod sqlite;

pub use sqlite::SqliteStore;

/// A read-only snapshot of one user record, fetched once per run.
///
/// Field values may still be legacy plaintext, so the snapshot zeroes
/// its memory when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct CandidateRecord {
    pub id: i64,
    /// Stable human-readable handle (the account email) used in
    /// failure reports; never the secret itself.
    pub identifier: String,
    pub secret: Option<String>,
    pub backup_codes: Option<String>,
}

/// The combined write for one migrated record.
///
/// Carries the final value for every column it touches — newly
/// encrypted, passed through, or absent — so the store can persist the
/// whole record in one statement.
#[derive(Debug, Clone)]
pub struct EncryptedUpdate {
    pub id: i64,
    pub secret: Option<String>,
    pub backup_codes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction the migration runs against.
pub trait RecordStore {
    /// Fetch every record that may need migration, in one pass.
    ///
    /// The whole candidate set is materialized in memory; there is no
    /// pagination.  Fine at migration scale, a known ceiling beyond it.
    fn fetch_candidates(&self) -> Result<Vec<CandidateRecord>>;

    /// Persist one migrated record — secret, backup codes and the
    /// updated timestamp — as a single atomic write.
    fn write_back(&mut self, update: &EncryptedUpdate) -> Result<()>;
}
