//! FHE Error types

use thiserror::Error;

/// Errors that can occur during FHE operations
#[derive(Error, Debug)]
pub enum FHEError {
    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Key set does not match the expected configuration
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Plaintext scalar rejected by an operation (e.g. division by zero)
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// Plaintext factor does not fit the 64-bit ciphertext domain
    #[error("Overflow during computation")]
    Overflow,
}

impl From<bincode::Error> for FHEError {
    fn from(e: bincode::Error) -> Self {
        FHEError::SerializationError(e.to_string())
    }
}
