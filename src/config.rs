//! Key-material configuration.
//!
//! The encryption passphrase and salt are supplied through the
//! environment (`OTPVAULT_PASSPHRASE`, `OTPVAULT_SALT`), the same way
//! CI secrets usually reach a one-shot tool. There is no config file:
//! both values are secrets or secret-adjacent and should never be
//! written to disk by this tool.

use zeroize::Zeroizing;

use crate::errors::{OtpVaultError, Result};

/// Environment variable holding the encryption passphrase.
pub const PASSPHRASE_ENV: &str = "OTPVAULT_PASSPHRASE";

/// Environment variable holding the key-derivation salt.
pub const SALT_ENV: &str = "OTPVAULT_SALT";

/// Fallback salt used when `OTPVAULT_SALT` is unset or empty.
///
/// A fixed public literal: it keeps development setups working, but
/// gives up the per-deployment uniqueness a salt is for. The CLI warns
/// whenever it is in use.
pub const DEFAULT_SALT: &str = "otpvault-default-salt";

/// Key material for the encryption subsystem, loaded from the environment.
pub struct EncryptionConfig {
    passphrase: Zeroizing<String>,
    salt: String,
    default_salt: bool,
}

impl EncryptionConfig {
    /// Load the passphrase and salt from the environment.
    ///
    /// Fails with [`OtpVaultError::Config`] when `OTPVAULT_PASSPHRASE`
    /// is unset. Passphrase strength is checked later, at key
    /// derivation.
    pub fn from_env() -> Result<Self> {
        let passphrase = std::env::var(PASSPHRASE_ENV).map_err(|_| {
            OtpVaultError::Config(format!(
                "{PASSPHRASE_ENV} is not set — generate a value with `otpvault keygen`"
            ))
        })?;

        let (salt, default_salt) = match std::env::var(SALT_ENV) {
            Ok(s) if !s.is_empty() => (s, false),
            _ => (DEFAULT_SALT.to_string(), true),
        };

        Ok(Self {
            passphrase: Zeroizing::new(passphrase),
            salt,
            default_salt,
        })
    }

    /// Build a config from explicit values instead of the environment.
    pub fn new(passphrase: impl Into<String>, salt: impl Into<String>) -> Self {
        let salt = salt.into();
        let default_salt = salt == DEFAULT_SALT;
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
            salt,
            default_salt,
        }
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// True when the fallback salt is in use and the CLI should warn.
    pub fn uses_default_salt(&self) -> bool {
        self.default_salt
    }
}
