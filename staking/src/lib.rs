//! zstake Staking Engine
//!
//! Confidential staking: stake amounts and accrued rewards are held only as
//! TFHE ciphertexts, rewards accrue linearly in time, and claims are paid
//! out as encrypted credits on a confidential token.
//!
//! # Components:
//! - [`StakingEngine`]: stake, withdraw, claim and read-only queries
//! - [`AccountLedger`]: account records over a [`StateBackend`]
//! - [`accrue`]: homomorphic time-proportional reward accrual
//! - [`ConfidentialToken`] / [`Zcoin`]: reward token receiving claims
//! - [`DecryptionService`]: ACL-checked decryption for account owners
//! - [`MemoryBackend`]: in-process storage; the `zstake-storage` crate
//!   provides the persistent one

pub mod accrual;
pub mod backend;
pub mod clock;
pub mod decryption;
pub mod engine;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod memory;
pub mod token;
pub mod types;

pub use accrual::{accrue, expected_reward};
pub use backend::{
    AccountRecord, Acl, CiphertextSource, PendingClaim, StateBackend, TokenBackend, TokenCredit,
    WriteBatch,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use decryption::DecryptionService;
pub use engine::{Release, StakingEngine};
pub use errors::{StakingError, StakingResult};
pub use events::{EventRecord, StakingEvent};
pub use ledger::{Account, AccountLedger, AccountLocks};
pub use memory::MemoryBackend;
pub use token::{ConfidentialToken, Zcoin};
pub use types::{AccountId, ClaimId, EncryptedAmount, Handle};
pub use zstake_fhe::SECONDS_PER_DAY;

/// Base-asset units per whole staked unit (18 decimals)
pub const STAKE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Decimals of the reward token
pub const REWARD_DECIMALS: u32 = 6;

/// Whole reward tokens earned per staked unit per day
pub const REWARD_PER_UNIT_PER_DAY: u64 = 1_000;

/// Reward base units per staked unit per day
pub const REWARD_RATE: u64 = REWARD_PER_UNIT_PER_DAY * 10u64.pow(REWARD_DECIMALS);


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_rate() {
        assert_eq!(REWARD_RATE, 1_000_000_000);
        assert_eq!(STAKE_UNIT, 10u128.pow(18));
    }
}
