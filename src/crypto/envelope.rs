//! The three-part ciphertext envelope.
//!
//! Encrypted values are stored as a single UTF-8 string:
//!
//!   base64(nonce):base64(ciphertext):base64(tag)
//!
//! Standard padded base64, a 16-byte nonce and a 16-byte GCM tag. The
//! format is human-inspectable and needs no length prefixes; parsing
//! fails closed on anything that does not match it exactly.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::{OtpVaultError, Result};

/// Separator between the envelope's base64 segments.
pub const DELIMITER: char = ':';

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_LEN: usize = 16;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// A parsed ciphertext envelope: nonce, ciphertext and auth tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEnvelope {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl SecretEnvelope {
    /// Parse the `nonce:ciphertext:tag` transport form.
    ///
    /// Fails with [`OtpVaultError::Format`] on a wrong segment count,
    /// invalid base64, a nonce or tag of the wrong length, or an empty
    /// ciphertext — never a best-effort guess.
    pub fn decode(value: &str) -> Result<Self> {
        let segments: Vec<&str> = value.split(DELIMITER).collect();
        if segments.len() != 3 {
            return Err(OtpVaultError::Format(format!(
                "expected 3 segments separated by '{DELIMITER}', got {}",
                segments.len()
            )));
        }

        let nonce_bytes = BASE64
            .decode(segments[0])
            .map_err(|e| OtpVaultError::Format(format!("nonce is not valid base64: {e}")))?;
        let ciphertext = BASE64
            .decode(segments[1])
            .map_err(|e| OtpVaultError::Format(format!("ciphertext is not valid base64: {e}")))?;
        let tag_bytes = BASE64
            .decode(segments[2])
            .map_err(|e| OtpVaultError::Format(format!("auth tag is not valid base64: {e}")))?;

        let nonce: [u8; NONCE_LEN] = nonce_bytes.try_into().map_err(|b: Vec<u8>| {
            OtpVaultError::Format(format!("nonce must be {NONCE_LEN} bytes, got {}", b.len()))
        })?;
        let tag: [u8; TAG_LEN] = tag_bytes.try_into().map_err(|b: Vec<u8>| {
            OtpVaultError::Format(format!("auth tag must be {TAG_LEN} bytes, got {}", b.len()))
        })?;

        if ciphertext.is_empty() {
            return Err(OtpVaultError::Format("ciphertext segment is empty".into()));
        }

        Ok(Self {
            nonce,
            ciphertext,
            tag,
        })
    }

    /// Whether a stored value already carries an envelope.
    ///
    /// Content heuristic, not a versioned marker: a value counts as
    /// encrypted iff it contains the delimiter. Legacy plaintext that
    /// happens to contain `:` is therefore misclassified and skipped —
    /// base32 TOTP secrets and dash-separated backup codes never
    /// contain it, so well-formed data is unaffected.
    pub fn looks_encrypted(value: &str) -> bool {
        value.contains(DELIMITER)
    }
}

impl fmt::Display for SecretEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            BASE64.encode(self.nonce),
            BASE64.encode(&self.ciphertext),
            BASE64.encode(self.tag)
        )
    }
}
