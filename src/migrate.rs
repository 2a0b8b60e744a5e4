//! The plaintext-to-encrypted batch migration.
//!
//! Walks every candidate record, classifies each field as legacy
//! plaintext or already encrypted, encrypts what needs it, and issues
//! one combined write per record.  A failure in one record never stops
//! the rest of the batch; the summary reports exactly what happened.
//!
//! Re-running is always safe: encrypted fields are recognized and
//! passed through, so a second run only touches records the first one
//! missed or failed on.

use chrono::Utc;
use serde::Serialize;

use crate::crypto::envelope::SecretEnvelope;
use crate::crypto::{parse_backup_codes, SecretCipher};
use crate::errors::{OtpVaultError, Result};
use crate::store::{CandidateRecord, EncryptedUpdate, RecordStore};

/// What happened to one candidate record.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// At least one field was encrypted and the record was written.
    Migrated,
    /// Every present field already carried an envelope, or none was
    /// present at all.
    Skipped,
    /// A transform or the write failed; the record was left untouched.
    Failed(OtpVaultError),
}

/// One failed record, kept for the report.
#[derive(Debug, Serialize)]
pub struct RecordFailure {
    pub id: i64,
    pub identifier: String,
    pub reason: String,
}

/// Aggregate result of one run.
#[derive(Debug, Default, Serialize)]
pub struct MigrationSummary {
    pub total: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<RecordFailure>,
}

impl MigrationSummary {
    fn tally(&mut self, record: &CandidateRecord, outcome: MigrationOutcome) {
        match outcome {
            MigrationOutcome::Migrated => self.migrated += 1,
            MigrationOutcome::Skipped => self.skipped += 1,
            MigrationOutcome::Failed(e) => {
                self.failed += 1;
                self.failures.push(RecordFailure {
                    id: record.id,
                    identifier: record.identifier.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Sequential, re-runnable migration over a [`RecordStore`].
pub struct MigrationRunner<'a> {
    cipher: &'a SecretCipher,
    dry_run: bool,
}

impl<'a> MigrationRunner<'a> {
    /// With `dry_run` set, records are classified and transformed but
    /// nothing is written.
    pub fn new(cipher: &'a SecretCipher, dry_run: bool) -> Self {
        Self { cipher, dry_run }
    }

    /// Run the migration over every candidate in `store`.
    ///
    /// Only run-aborting conditions (the candidate fetch) error out of
    /// this function; per-record failures are folded into the summary
    /// and the batch keeps going.
    pub fn run(&self, store: &mut dyn RecordStore) -> Result<MigrationSummary> {
        let candidates = store.fetch_candidates()?;

        let mut summary = MigrationSummary {
            total: candidates.len(),
            ..Default::default()
        };

        for record in &candidates {
            let outcome = self.migrate_record(store, record);
            summary.tally(record, outcome);
        }

        Ok(summary)
    }

    /// Classify and, if needed, migrate one record.
    ///
    /// Both fields are transformed before anything is written, so a
    /// record is either fully migrated or untouched — never half-done.
    fn migrate_record(
        &self,
        store: &mut dyn RecordStore,
        record: &CandidateRecord,
    ) -> MigrationOutcome {
        let secret = match plan_secret(self.cipher, record.secret.as_deref()) {
            Ok(plan) => plan,
            Err(e) => return MigrationOutcome::Failed(e),
        };
        let codes = match plan_backup_codes(self.cipher, record.backup_codes.as_deref()) {
            Ok(plan) => plan,
            Err(e) => return MigrationOutcome::Failed(e),
        };

        if !secret.changed && !codes.changed {
            return MigrationOutcome::Skipped;
        }

        if self.dry_run {
            return MigrationOutcome::Migrated;
        }

        let update = EncryptedUpdate {
            id: record.id,
            secret: secret.value,
            backup_codes: codes.value,
            updated_at: Utc::now(),
        };

        match store.write_back(&update) {
            Ok(()) => MigrationOutcome::Migrated,
            Err(e) => MigrationOutcome::Failed(e),
        }
    }
}

/// The post-migration value for one column, plus whether it changed.
struct FieldPlan {
    value: Option<String>,
    changed: bool,
}

impl FieldPlan {
    fn unchanged(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            changed: false,
        }
    }
}

/// Decide what the secret column should hold after migration.
///
/// Absent and already-encrypted values pass through unchanged; only
/// legacy plaintext is encrypted.
fn plan_secret(cipher: &SecretCipher, current: Option<&str>) -> Result<FieldPlan> {
    match current {
        None => Ok(FieldPlan::unchanged(None)),
        Some(value) if SecretEnvelope::looks_encrypted(value) => {
            Ok(FieldPlan::unchanged(Some(value)))
        }
        Some(value) => {
            let envelope = cipher.encrypt_secret(value)?;
            Ok(FieldPlan {
                value: Some(envelope.to_string()),
                changed: true,
            })
        }
    }
}

/// Decide what the backup-codes column should hold after migration.
///
/// Legacy values must parse as a non-empty JSON array of strings; any
/// other shape fails the record, exactly like a cipher error would.
fn plan_backup_codes(cipher: &SecretCipher, current: Option<&str>) -> Result<FieldPlan> {
    match current {
        None => Ok(FieldPlan::unchanged(None)),
        Some(value) if SecretEnvelope::looks_encrypted(value) => {
            Ok(FieldPlan::unchanged(Some(value)))
        }
        Some(value) => {
            let codes = parse_backup_codes(value)?;
            let envelope = cipher.encrypt_backup_codes(&codes)?;
            Ok(FieldPlan {
                value: Some(envelope.to_string()),
                changed: true,
            })
        }
    }
}
