//! `otpvault history` — show past migration runs.
//!
//! Usage:
//!   otpvault history --db app.db            # last 20 runs
//!   otpvault history --db app.db --last 5

use std::path::Path;

use crate::audit::MigrationLog;
use crate::cli::output;
use crate::errors::{OtpVaultError, Result};

/// Execute the `history` command.
pub fn execute(db: &Path, last: usize) -> Result<()> {
    // Opening a missing file would create an empty database; check first.
    if !db.exists() {
        return Err(OtpVaultError::Store(format!(
            "database not found at {}",
            db.display()
        )));
    }

    let log = MigrationLog::open(db)
        .ok_or_else(|| OtpVaultError::Store("failed to open run history".into()))?;

    let entries = log.recent(last)?;

    if entries.is_empty() {
        output::info("No migration runs recorded yet.");
        return Ok(());
    }

    output::print_history_table(&entries);
    Ok(())
}
