//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The cost parameters are fixed: changing any of
//! them changes every derived key, so they are constants here rather
//! than configuration.

use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::errors::{OtpVaultError, Result};

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum accepted passphrase length in characters.
///
/// 64 hex characters encode 256 bits of entropy; `otpvault keygen`
/// emits exactly that. Only the length is enforced — a long diceware
/// phrase is not turned away for failing a hex check.
pub const MIN_PASSPHRASE_LEN: usize = 64;

/// Memory cost in KiB (64 MB).
const MEMORY_KIB: u32 = 65_536;

/// Number of iterations.
const ITERATIONS: u32 = 3;

/// Parallelism lanes.
const PARALLELISM: u32 = 4;

/// A wrapper around the 32-byte derived key that automatically zeroes
/// its memory when dropped.
///
/// Use this to hold the key in memory so it cannot linger after it is
/// no longer needed.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Create a new `DerivedKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build the AEAD cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive a 32-byte encryption key from a passphrase and salt.
///
/// The same passphrase + salt will always produce the same key, so
/// independent processes configured alike decrypt each other's data.
///
/// Fails with [`OtpVaultError::Config`] when the passphrase is empty or
/// shorter than [`MIN_PASSPHRASE_LEN`] characters.
pub fn derive_key(passphrase: &str, salt: &str) -> Result<DerivedKey> {
    if passphrase.len() < MIN_PASSPHRASE_LEN {
        return Err(OtpVaultError::Config(format!(
            "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters (got {}) — generate one with `otpvault keygen`",
            passphrase.len()
        )));
    }

    // Argon2 rejects salts shorter than 8 bytes, but operators may
    // supply a salt of any length. Hashing it to a fixed 32-byte block
    // first accepts every input and stays deterministic.
    let salt_block = Sha256::digest(salt.as_bytes());

    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, Some(KEY_LEN))
        .map_err(|e| OtpVaultError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key_bytes = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase.as_bytes(), &salt_block, &mut key_bytes)
        .map_err(|e| OtpVaultError::KeyDerivation(format!("Argon2id hashing failed: {e}")))?;

    let key = DerivedKey::new(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}
