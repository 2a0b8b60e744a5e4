use thiserror::Error;

/// All errors that can occur in OtpVault.
#[derive(Debug, Error)]
pub enum OtpVaultError {
    // --- Configuration errors ---
    #[error("Config error: {0}")]
    Config(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    Decrypt,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Invalid envelope format: {0}")]
    Format(String),

    #[error("Invalid input: {0}")]
    Input(String),

    // --- Store errors ---
    #[error("Record store error: {0}")]
    Store(String),

    // --- Migration errors ---
    #[error("Migration finished with {0} failed record(s) — re-run after fixing them")]
    MigrationIncomplete(usize),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for OtpVault results.
pub type Result<T> = std::result::Result<T, OtpVaultError>;
