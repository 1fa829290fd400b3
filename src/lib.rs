//! zstake: Confidential Staking
//!
//! This is the root crate that re-exports all zstake components for integration
//! testing and provides unified access to the engine.
//!
//! ## Architecture Overview
//!
//! Stakers lock whole units of a base asset and earn a reward token at a fixed
//! rate per unit per day. Stake amounts and rewards exist only as TFHE
//! ciphertexts; the engine evaluates accrual homomorphically and never holds a
//! decryption key.
//!
//! ## Crate Organization
//!
//! - `zstake-fhe`: TFHE-rs keys, ciphertexts and scalar arithmetic
//! - `zstake-staking`: engine, ledger, accrual, reward token, decryption service
//! - `zstake-storage`: redb persistence
//! - `zstake-cli`: the `zstake` binary

pub use zstake_fhe as fhe;
pub use zstake_staking as staking;
pub use zstake_storage as storage;

/// zstake protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use zstake_fhe::{FHEConfig, FHEServer, KeyPair};
    pub use zstake_staking::{
        AccountId, Clock, ConfidentialToken, DecryptionService, Handle, ManualClock,
        MemoryBackend, Release, StakingEngine, StakingError, StakingEvent, SystemClock, Zcoin,
        REWARD_RATE, SECONDS_PER_DAY, STAKE_UNIT,
    };
    pub use zstake_storage::RedbBackend;
}
