//! Startup self-test for the encryption subsystem.
//!
//! Before a migration touches real records, derive the key and prove a
//! full encrypt/decrypt round trip works.  Misconfiguration then fails
//! loudly at startup instead of surfacing halfway through a batch.

use crate::config::EncryptionConfig;
use crate::crypto::cipher::SecretCipher;
use crate::crypto::kdf;
use crate::errors::{OtpVaultError, Result};

/// Fixed probe string exercised by the round trip.
const PROBE: &str = "otpvault-selftest-probe";

/// Derive the key from `config` and verify one full round trip.
///
/// Every failure — a weak passphrase, a KDF fault, a cipher fault, a
/// probe that does not survive the round trip — comes back as
/// [`OtpVaultError::Config`], since each one means this deployment is
/// not safe to run against real data.  On success the proven cipher is
/// returned so the process uses exactly the key material that passed.
pub fn validate(config: &EncryptionConfig) -> Result<SecretCipher> {
    let key = match kdf::derive_key(config.passphrase(), config.salt()) {
        Ok(key) => key,
        Err(e @ OtpVaultError::Config(_)) => return Err(e),
        Err(other) => {
            return Err(OtpVaultError::Config(format!(
                "key derivation failed: {other}"
            )))
        }
    };

    let cipher = SecretCipher::new(key);

    let envelope = cipher
        .encrypt_secret(PROBE)
        .map_err(|e| OtpVaultError::Config(format!("encryption self-test failed: {e}")))?;
    let recovered = cipher
        .decrypt_secret(&envelope)
        .map_err(|e| OtpVaultError::Config(format!("encryption self-test failed: {e}")))?;

    if recovered != PROBE {
        return Err(OtpVaultError::Config(
            "encryption self-test failed: round trip altered the probe value".into(),
        ));
    }

    Ok(cipher)
}
