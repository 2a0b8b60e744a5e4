//! `otpvault check` — validate configuration and the encryption self-test.
//!
//! Runs the same startup validation `migrate` performs, without opening
//! any database.  Useful as a deploy-time smoke test.

use crate::cli::output;
use crate::config::EncryptionConfig;
use crate::crypto::selftest;
use crate::errors::Result;

/// Execute the `check` command.
pub fn execute() -> Result<()> {
    let config = EncryptionConfig::from_env()?;

    if config.uses_default_salt() {
        output::warning(
            "OTPVAULT_SALT is not set — using the built-in default salt. \
             Set a per-deployment value in production.",
        );
    }

    selftest::validate(&config)?;

    output::success("Configuration valid — encryption round trip passed.");
    Ok(())
}
