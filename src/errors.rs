use thiserror::Error;

/// All errors that can occur in pmanager.
#[derive(Debug, Error)]
pub enum PmError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong password or corrupted record")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Store errors ---
    #[error("Access denied")]
    AccessDenied,

    #[error("Couldn't find password for '{0}'")]
    RecordNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("Clipboard error: {0}")]
    ClipboardError(String),
}

/// Convenience type alias for pmanager results.
pub type Result<T> = std::result::Result<T, PmError>;
