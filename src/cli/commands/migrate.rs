//! `otpvault migrate` — encrypt legacy plaintext TOTP fields in place.
//!
//! Usage:
//!   otpvault migrate --db app.db              # migrate the users table
//!   otpvault migrate --db app.db --dry-run    # preview without writing
//!   otpvault migrate --db app.db --json       # machine-readable summary

use std::path::Path;

use dialoguer::Confirm;

use crate::audit;
use crate::cli::output;
use crate::config::EncryptionConfig;
use crate::crypto::selftest;
use crate::errors::{OtpVaultError, Result};
use crate::migrate::MigrationRunner;
use crate::store::SqliteStore;

/// Execute the `migrate` command.
pub fn execute(db: &Path, table: &str, dry_run: bool, yes: bool, json: bool) -> Result<()> {
    // 1. Validate configuration and prove the cipher round-trips before
    //    anything touches real data.
    let config = EncryptionConfig::from_env()?;
    if config.uses_default_salt() {
        output::warning(
            "OTPVAULT_SALT is not set — using the built-in default salt. \
             Set a per-deployment value in production.",
        );
    }
    let cipher = selftest::validate(&config)?;

    // 2. Open the store up front so a bad path or table fails fast.
    let mut store = SqliteStore::open(db, table)?;

    // 3. Unless --yes or --dry-run, confirm the in-place rewrite.
    if !dry_run && !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Encrypt plaintext TOTP fields in '{table}' at {} in place?",
                db.display()
            ))
            .default(false)
            .interact()
            .map_err(|e| OtpVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // 4. Run the batch.
    let runner = MigrationRunner::new(&cipher, dry_run);
    let summary = runner.run(&mut store)?;

    // 5. Record real runs in the history table (best effort).
    if !dry_run {
        audit::record_run(db, &summary);
    }

    // 6. Report.
    if json {
        let report = serde_json::to_string_pretty(&summary)
            .map_err(|e| OtpVaultError::Serialization(format!("summary: {e}")))?;
        println!("{report}");
    } else {
        if dry_run {
            output::info("Dry run — nothing was written.");
        }
        output::print_summary_table(&summary);
        if summary.failed == 0 {
            output::success(&format!(
                "{} record(s) migrated, {} skipped",
                summary.migrated, summary.skipped
            ));
        }
    }

    // 7. A partial failure exits non-zero so CI and operators notice;
    //    every candidate was still attempted, and re-running is safe.
    if summary.failed > 0 {
        return Err(OtpVaultError::MigrationIncomplete(summary.failed));
    }

    Ok(())
}
