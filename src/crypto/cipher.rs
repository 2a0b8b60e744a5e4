//! AES-256-GCM authenticated encryption over [`SecretEnvelope`]s.
//!
//! The envelope carries a 16-byte nonce, so the cipher is the generic
//! `AesGcm<Aes256, U16>` rather than the 12-byte-nonce `Aes256Gcm`
//! default.  Each call to `encrypt_secret` generates a fresh random
//! nonce; the AEAD appends the 16-byte tag to its output, which is
//! split back off so the envelope stores it detached.

use aes_gcm::aead::generic_array::typenum::U16;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::{AeadCore, AesGcm, Key, Nonce};
use zeroize::Zeroizing;

use crate::crypto::envelope::{SecretEnvelope, NONCE_LEN, TAG_LEN};
use crate::crypto::kdf::DerivedKey;
use crate::errors::{OtpVaultError, Result};

/// AES-256-GCM parameterized with the envelope's 16-byte nonce.
type EnvelopeAead = AesGcm<Aes256, U16>;

/// Authenticated encryption for stored secrets and backup codes.
///
/// Holds the derived key by value — no process-wide singleton — so
/// several ciphers with distinct keys can coexist in one process.
/// Obtain a validated instance from [`crate::crypto::selftest::validate`].
pub struct SecretCipher {
    cipher: EnvelopeAead,
}

impl SecretCipher {
    /// Build a cipher from a derived key.
    ///
    /// The key is consumed and lives on only inside the AEAD state.
    pub fn new(key: DerivedKey) -> Self {
        let cipher = EnvelopeAead::new(Key::<EnvelopeAead>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypt a single secret string into an envelope.
    ///
    /// A fresh random nonce is generated inside this call; callers
    /// never supply or reuse nonce material.  Empty input is rejected
    /// with [`OtpVaultError::Input`] before any cryptographic work.
    pub fn encrypt_secret(&self, plaintext: &str) -> Result<SecretEnvelope> {
        if plaintext.is_empty() {
            return Err(OtpVaultError::Input(
                "cannot encrypt an empty secret".into(),
            ));
        }

        let nonce = EnvelopeAead::generate_nonce(&mut OsRng);

        let mut sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| OtpVaultError::Encryption(format!("AES-GCM error: {e}")))?;

        // Split the appended tag back off: [ ciphertext | 16-byte tag ].
        let tag_start = sealed.len() - TAG_LEN;
        let tag_bytes = sealed.split_off(tag_start);

        let mut nonce_arr = [0u8; NONCE_LEN];
        nonce_arr.copy_from_slice(&nonce);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&tag_bytes);

        Ok(SecretEnvelope {
            nonce: nonce_arr,
            ciphertext: sealed,
            tag,
        })
    }

    /// Decrypt an envelope back to the secret string.
    ///
    /// Fails closed: a tag mismatch — tampering, the wrong key,
    /// corruption — yields [`OtpVaultError::Decrypt`] and nothing else;
    /// partial plaintext is never returned.
    pub fn decrypt_secret(&self, envelope: &SecretEnvelope) -> Result<String> {
        let mut sealed = Vec::with_capacity(envelope.ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(&envelope.ciphertext);
        sealed.extend_from_slice(&envelope.tag);

        let nonce = Nonce::<U16>::from_slice(&envelope.nonce);
        let plaintext = Zeroizing::new(
            self.cipher
                .decrypt(nonce, sealed.as_slice())
                .map_err(|_| OtpVaultError::Decrypt)?,
        );

        match std::str::from_utf8(&plaintext) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => Err(OtpVaultError::Format(
                "decrypted bytes are not valid UTF-8".into(),
            )),
        }
    }

    /// Encrypt an ordered list of backup codes as one envelope.
    ///
    /// The codes are serialized to a JSON array first, so order
    /// survives the round trip.  An empty list is rejected with
    /// [`OtpVaultError::Input`].
    pub fn encrypt_backup_codes(&self, codes: &[String]) -> Result<SecretEnvelope> {
        if codes.is_empty() {
            return Err(OtpVaultError::Input(
                "cannot encrypt an empty backup code list".into(),
            ));
        }

        let json = Zeroizing::new(
            serde_json::to_string(codes)
                .map_err(|e| OtpVaultError::Serialization(format!("backup codes: {e}")))?,
        );
        self.encrypt_secret(&json)
    }

    /// Decrypt an envelope produced by [`Self::encrypt_backup_codes`].
    pub fn decrypt_backup_codes(&self, envelope: &SecretEnvelope) -> Result<Vec<String>> {
        let json = Zeroizing::new(self.decrypt_secret(envelope)?);
        parse_backup_codes(&json)
    }
}

/// Parse a JSON backup-code payload, enforcing the schema strictly.
///
/// Only a non-empty array of strings is accepted; numbers, nested
/// arrays, nulls and other shapes are rejected with
/// [`OtpVaultError::Format`] rather than coerced.
pub fn parse_backup_codes(json: &str) -> Result<Vec<String>> {
    let codes: Vec<String> = serde_json::from_str(json).map_err(|e| {
        OtpVaultError::Format(format!("backup codes must be a JSON array of strings: {e}"))
    })?;

    if codes.is_empty() {
        return Err(OtpVaultError::Format("backup code list is empty".into()));
    }

    Ok(codes)
}
