//! Storage errors

use thiserror::Error;
use zstake_fhe::FHEError;
use zstake_staking::StakingError;

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table error
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    /// Commit error
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored ciphertext could not be decoded
    #[error("Ciphertext error: {0}")]
    Ciphertext(#[from] FHEError),

    /// Database written by an incompatible version
    #[error("Unsupported storage format {found}, expected {expected}")]
    Format { found: u32, expected: u32 },

    /// Database bound to a different FHE key set
    #[error("Key mismatch: database bound to {stored}, opened with {given}")]
    KeyMismatch { stored: String, given: String },

    /// Invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

impl From<StorageError> for StakingError {
    fn from(e: StorageError) -> Self {
        StakingError::Backend(e.to_string())
    }
}
