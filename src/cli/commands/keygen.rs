//! `otpvault keygen` — generate a passphrase for `OTPVAULT_PASSPHRASE`.
//!
//! Prints 64 hex characters (256 bits) from the OS RNG.  The value is
//! printed once and never stored anywhere by this tool.

use rand::TryRngCore;

use crate::cli::output;
use crate::errors::{OtpVaultError, Result};

/// Execute the `keygen` command.
pub fn execute() -> Result<()> {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| OtpVaultError::CommandFailed(format!("OS RNG failure: {e}")))?;

    let passphrase: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    println!("{passphrase}");

    output::tip(
        "export OTPVAULT_PASSPHRASE=<value above> — keep it in your secret manager, \
         not in shell history.",
    );
    Ok(())
}
