use thiserror::Error;

/// All errors that can occur in ChaffVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Authentication errors ---
    #[error("Vault salt is missing — the vault was never initialized or its metadata is damaged")]
    AuthDataMissing,

    #[error("No master key is stored — the vault was never initialized")]
    MasterKeyMissing,

    #[error("Authentication failed — wrong password")]
    AuthMismatch,

    // --- Record errors ---
    #[error("Record '{0}' not found")]
    RecordNotFound(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    // --- Import/export errors ---
    #[error("Import document is corrupt: {0}")]
    ImportCorrupt(String),

    // --- Config errors ---
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,
}

impl From<rusqlite::Error> for VaultError {
    fn from(e: rusqlite::Error) -> Self {
        VaultError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::Serialization(e.to_string())
    }
}

/// Convenience type alias for ChaffVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
