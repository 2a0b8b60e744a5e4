//! Integration tests for the OtpVault crypto module.

use otpvault::config::EncryptionConfig;
use otpvault::crypto::envelope::{NONCE_LEN, TAG_LEN};
use otpvault::crypto::{derive_key, parse_backup_codes, selftest, SecretCipher, SecretEnvelope};
use otpvault::errors::OtpVaultError;

/// Helper: cipher derived from the reference passphrase and salt.
fn test_cipher() -> SecretCipher {
    let key = derive_key(&"a".repeat(64), "s1").expect("derive key");
    SecretCipher::new(key)
}

// ---------------------------------------------------------------------------
// Key derivation (Argon2id)
// ---------------------------------------------------------------------------

#[test]
fn derive_key_same_inputs_same_output() {
    let passphrase = "a".repeat(64);

    let key1 = derive_key(&passphrase, "s1").expect("derive 1");
    let key2 = derive_key(&passphrase, "s1").expect("derive 2");

    assert_eq!(
        key1.as_bytes(),
        key2.as_bytes(),
        "same passphrase + salt must produce the same key"
    );
}

#[test]
fn derive_key_different_inputs_different_keys() {
    let base = derive_key(&"a".repeat(64), "s1").expect("derive base");
    let other_salt = derive_key(&"a".repeat(64), "s2").expect("derive other salt");
    let other_pass = derive_key(&"b".repeat(64), "s1").expect("derive other pass");

    assert_ne!(
        base.as_bytes(),
        other_salt.as_bytes(),
        "different salts must produce different keys"
    );
    assert_ne!(
        base.as_bytes(),
        other_pass.as_bytes(),
        "different passphrases must produce different keys"
    );
}

#[test]
fn derive_key_rejects_short_passphrase() {
    let result = derive_key(&"a".repeat(63), "s1");
    assert!(
        matches!(result, Err(OtpVaultError::Config(_))),
        "63 characters must be rejected as a config error"
    );

    let result = derive_key("", "s1");
    assert!(matches!(result, Err(OtpVaultError::Config(_))));
}

#[test]
fn derive_key_accepts_any_salt_length() {
    // The salt is normalized internally, so even extreme lengths work.
    derive_key(&"a".repeat(64), "").expect("empty salt");
    derive_key(&"a".repeat(64), "s1").expect("two-byte salt");
    derive_key(&"a".repeat(64), &"x".repeat(500)).expect("long salt");
}

// ---------------------------------------------------------------------------
// Envelope codec
// ---------------------------------------------------------------------------

#[test]
fn envelope_encodes_three_base64_segments() {
    let cipher = test_cipher();
    let envelope = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt");
    let encoded = envelope.to_string();

    assert_eq!(
        encoded.matches(':').count(),
        2,
        "envelope must contain exactly two delimiters"
    );

    let segments: Vec<&str> = encoded.split(':').collect();
    assert_eq!(segments.len(), 3);
    for segment in &segments {
        assert!(!segment.is_empty(), "every envelope segment must be non-empty");
    }

    // Decoding proves each segment is valid base64 of the right shape.
    let reparsed = SecretEnvelope::decode(&encoded).expect("decode");
    assert_eq!(reparsed, envelope, "decode must invert encode exactly");
    assert_eq!(reparsed.nonce.len(), NONCE_LEN);
    assert_eq!(reparsed.tag.len(), TAG_LEN);
}

#[test]
fn envelope_decode_rejects_wrong_segment_count() {
    for value in ["", "abc", "a:b", "a:b:c:d", "JBSWY3DPEHPK3PXP"] {
        let result = SecretEnvelope::decode(value);
        assert!(
            matches!(result, Err(OtpVaultError::Format(_))),
            "'{value}' must be rejected as a format error"
        );
    }
}

#[test]
fn envelope_decode_rejects_bad_base64() {
    let result = SecretEnvelope::decode("not base64!:YWJj:YWJj");
    assert!(matches!(result, Err(OtpVaultError::Format(_))));
}

#[test]
fn envelope_decode_rejects_wrong_component_lengths() {
    let cipher = test_cipher();
    let envelope = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt");
    let encoded = envelope.to_string();
    let segments: Vec<&str> = encoded.split(':').collect();

    // "YWJj" is base64 for "abc" — valid base64, wrong length.
    let short_nonce = format!("YWJj:{}:{}", segments[1], segments[2]);
    assert!(matches!(
        SecretEnvelope::decode(&short_nonce),
        Err(OtpVaultError::Format(_))
    ));

    let short_tag = format!("{}:{}:YWJj", segments[0], segments[1]);
    assert!(matches!(
        SecretEnvelope::decode(&short_tag),
        Err(OtpVaultError::Format(_))
    ));

    // Empty (but present) ciphertext segment decodes to zero bytes.
    let empty_ciphertext = format!("{}::{}", segments[0], segments[2]);
    assert!(matches!(
        SecretEnvelope::decode(&empty_ciphertext),
        Err(OtpVaultError::Format(_))
    ));
}

#[test]
fn looks_encrypted_is_a_delimiter_check() {
    assert!(SecretEnvelope::looks_encrypted("a:b:c"));
    assert!(
        SecretEnvelope::looks_encrypted("legacy:value"),
        "any value containing the delimiter counts as encrypted"
    );
    assert!(!SecretEnvelope::looks_encrypted("JBSWY3DPEHPK3PXP"));
    assert!(!SecretEnvelope::looks_encrypted(""));
}

// ---------------------------------------------------------------------------
// Secret encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let cipher = test_cipher();

    let envelope = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt");
    let recovered = cipher.decrypt_secret(&envelope).expect("decrypt");

    assert_eq!(recovered, "JBSWY3DPEHPK3PXP");
}

#[test]
fn encrypt_roundtrips_through_transport_form() {
    let cipher = test_cipher();

    let stored = cipher
        .encrypt_secret("JBSWY3DPEHPK3PXP")
        .expect("encrypt")
        .to_string();
    let envelope = SecretEnvelope::decode(&stored).expect("decode");
    let recovered = cipher.decrypt_secret(&envelope).expect("decrypt");

    assert_eq!(recovered, "JBSWY3DPEHPK3PXP");
}

#[test]
fn encrypt_produces_different_envelopes_each_time() {
    let cipher = test_cipher();

    let e1 = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt 1");
    let e2 = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt 2");

    // Because each call generates a new random nonce, the output must differ.
    assert_ne!(
        e1.to_string(),
        e2.to_string(),
        "two encryptions of the same plaintext must differ"
    );
    assert_ne!(e1.nonce, e2.nonce, "nonces must be fresh per call");

    assert_eq!(cipher.decrypt_secret(&e1).expect("decrypt 1"), "JBSWY3DPEHPK3PXP");
    assert_eq!(cipher.decrypt_secret(&e2).expect("decrypt 2"), "JBSWY3DPEHPK3PXP");
}

#[test]
fn encrypt_rejects_empty_plaintext() {
    let cipher = test_cipher();
    let result = cipher.encrypt_secret("");
    assert!(
        matches!(result, Err(OtpVaultError::Input(_))),
        "empty plaintext must be an input error"
    );
}

#[test]
fn decrypt_with_wrong_key_fails_closed() {
    let cipher_a = SecretCipher::new(derive_key(&"a".repeat(64), "s1").expect("derive a"));
    let cipher_b = SecretCipher::new(derive_key(&"b".repeat(64), "s1").expect("derive b"));

    let envelope = cipher_a.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt");
    let result = cipher_b.decrypt_secret(&envelope);

    assert!(
        matches!(result, Err(OtpVaultError::Decrypt)),
        "decryption under a different key must fail, never return plaintext"
    );
}

#[test]
fn decrypt_detects_ciphertext_tampering() {
    let cipher = test_cipher();
    let envelope = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt");

    // Every single byte position must be covered by the auth check.
    for i in 0..envelope.ciphertext.len() {
        let mut tampered = envelope.clone();
        tampered.ciphertext[i] ^= 0xFF;

        let result = cipher.decrypt_secret(&tampered);
        assert!(
            matches!(result, Err(OtpVaultError::Decrypt)),
            "a flipped ciphertext byte at position {i} must fail the auth check"
        );
    }
}

#[test]
fn decrypt_detects_tag_tampering() {
    let cipher = test_cipher();
    let envelope = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt");

    for i in 0..envelope.tag.len() {
        let mut tampered = envelope.clone();
        tampered.tag[i] ^= 0x01;

        let result = cipher.decrypt_secret(&tampered);
        assert!(
            matches!(result, Err(OtpVaultError::Decrypt)),
            "a flipped tag byte at position {i} must fail the auth check"
        );
    }
}

// ---------------------------------------------------------------------------
// Backup codes
// ---------------------------------------------------------------------------

#[test]
fn backup_codes_roundtrip_in_order() {
    let cipher = test_cipher();
    let codes = vec!["ABCD-1234".to_string(), "EFGH-5678".to_string()];

    let envelope = cipher.encrypt_backup_codes(&codes).expect("encrypt");
    let recovered = cipher.decrypt_backup_codes(&envelope).expect("decrypt");

    assert_eq!(recovered, codes, "codes must come back in the same order");
}

#[test]
fn backup_codes_reject_empty_list() {
    let cipher = test_cipher();
    let result = cipher.encrypt_backup_codes(&[]);
    assert!(matches!(result, Err(OtpVaultError::Input(_))));
}

#[test]
fn decrypt_backup_codes_rejects_non_list_payload() {
    let cipher = test_cipher();

    // A valid envelope whose plaintext is not a JSON array of strings.
    let envelope = cipher.encrypt_secret("just a secret").expect("encrypt");
    let result = cipher.decrypt_backup_codes(&envelope);

    assert!(
        matches!(result, Err(OtpVaultError::Format(_))),
        "non-JSON payload must be a format error, not a panic or empty list"
    );
}

#[test]
fn parse_backup_codes_enforces_schema() {
    assert_eq!(
        parse_backup_codes(r#"["ABCD-1234","EFGH-5678"]"#).expect("valid list"),
        vec!["ABCD-1234".to_string(), "EFGH-5678".to_string()]
    );

    for bad in [
        "",
        "not json",
        "[]",
        "[1, 2, 3]",
        r#"{"codes": ["ABCD-1234"]}"#,
        r#"["ABCD-1234", null]"#,
        r#""ABCD-1234""#,
    ] {
        let result = parse_backup_codes(bad);
        assert!(
            matches!(result, Err(OtpVaultError::Format(_))),
            "'{bad}' must be rejected as a format error"
        );
    }
}

// ---------------------------------------------------------------------------
// Startup self-test
// ---------------------------------------------------------------------------

#[test]
fn selftest_passes_with_valid_config() {
    let config = EncryptionConfig::new("a".repeat(64), "s1");
    let cipher = selftest::validate(&config).expect("self-test");

    // The returned cipher is ready for real work.
    let envelope = cipher.encrypt_secret("JBSWY3DPEHPK3PXP").expect("encrypt");
    assert_eq!(
        cipher.decrypt_secret(&envelope).expect("decrypt"),
        "JBSWY3DPEHPK3PXP"
    );
}

#[test]
fn selftest_surfaces_weak_passphrase_as_config_error() {
    let config = EncryptionConfig::new("too-short", "s1");
    let result = selftest::validate(&config);
    assert!(matches!(result, Err(OtpVaultError::Config(_))));
}
