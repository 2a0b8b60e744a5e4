//! Cryptographic core for OtpVault.
//!
//! This module provides:
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - The `nonce:ciphertext:tag` envelope codec (`envelope`)
//! - AES-256-GCM secret and backup-code encryption (`cipher`)
//! - The startup round-trip self-test (`selftest`)

pub mod cipher;
pub mod envelope;
pub mod kdf;
pub mod selftest;

// Re-export the most commonly used items so callers can write:
//   use otpvault::crypto::{derive_key, SecretCipher, SecretEnvelope};
pub use cipher::{parse_backup_codes, SecretCipher};
pub use envelope::SecretEnvelope;
pub use kdf::{derive_key, DerivedKey};
