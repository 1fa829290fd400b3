//! Staking Error Types

use thiserror::Error;
use zstake_fhe::FHEError;

use crate::types::Handle;

/// Errors that can occur in staking operations
///
/// Every rejected operation maps to exactly one variant and leaves the ledger
/// untouched.
#[derive(Error, Debug)]
pub enum StakingError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Amount {value} is not a whole multiple of the stake unit {unit}")]
    NotWholeUnit { value: u128, unit: u128 },

    #[error("Insufficient stake: requested {requested} units, staked {available}")]
    InsufficientStake { requested: u64, available: u64 },

    #[error("Clock regression: last accrual at {last}, host time {now}")]
    ClockRegression { last: u64, now: u64 },

    #[error("Requester is not allowed to decrypt {handle}")]
    UnauthorizedDecryption { handle: Handle },

    #[error("Unknown ciphertext handle {0}")]
    UnknownHandle(Handle),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("FHE operation failed: {0}")]
    Fhe(FHEError),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<FHEError> for StakingError {
    fn from(e: FHEError) -> Self {
        match e {
            FHEError::Overflow => StakingError::Overflow,
            other => StakingError::Fhe(other),
        }
    }
}

/// Result type for staking operations
pub type StakingResult<T> = Result<T, StakingError>;
