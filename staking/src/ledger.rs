//! Account ledger
//!
//! A key-value view over the backend: `get` materializes an [`Account`] with
//! its ciphertexts, `put` stages the record into the operation's batch. No
//! validation happens here.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{AccountRecord, StateBackend, WriteBatch};
use crate::errors::{StakingError, StakingResult};
use crate::types::{AccountId, EncryptedAmount, Handle};

/// Per-account staking state
#[derive(Debug, Clone)]
pub struct Account {
    /// Plaintext mirror of the encrypted stake, used for every control decision
    pub stake_units: u64,
    /// Staked amount in whole base-asset units
    pub encrypted_stake: EncryptedAmount,
    /// Accrued, unclaimed reward in reward-token base units
    pub encrypted_reward: EncryptedAmount,
    /// Seconds; 0 means never staked
    pub last_accrual: u64,
}

impl Account {
    /// Default record for an identity that has never staked
    pub fn blank(zero: &EncryptedAmount) -> Self {
        Self {
            stake_units: 0,
            encrypted_stake: zero.clone(),
            encrypted_reward: zero.clone(),
            last_accrual: 0,
        }
    }

    pub fn is_staked(&self) -> bool {
        self.stake_units > 0
    }

    pub fn record(&self) -> AccountRecord {
        AccountRecord {
            stake_units: self.stake_units,
            stake: self.encrypted_stake.handle,
            reward: self.encrypted_reward.handle,
            last_accrual: self.last_accrual,
        }
    }
}

pub struct AccountLedger<B> {
    backend: Arc<B>,
    zero: EncryptedAmount,
}

impl<B: StateBackend> AccountLedger<B> {
    /// `zero` must be stored under [`Handle::ZERO`]
    pub fn new(backend: Arc<B>, zero: EncryptedAmount) -> Self {
        debug_assert!(zero.handle.is_zero());
        Self { backend, zero }
    }

    pub fn zero(&self) -> &EncryptedAmount {
        &self.zero
    }

    /// Load an account; absent identities get the blank record
    pub fn get(&self, account: &AccountId) -> StakingResult<Account> {
        let Some(record) = self.backend.account(account)? else {
            return Ok(Account::blank(&self.zero));
        };

        Ok(Account {
            stake_units: record.stake_units,
            encrypted_stake: self.load(record.stake)?,
            encrypted_reward: self.load(record.reward)?,
            last_accrual: record.last_accrual,
        })
    }

    /// Plaintext fields and handles only, without loading ciphertexts
    pub fn record(&self, account: &AccountId) -> StakingResult<AccountRecord> {
        Ok(self
            .backend
            .account(account)?
            .unwrap_or_else(|| Account::blank(&self.zero).record()))
    }

    /// Stage an overwrite of the account record
    pub fn put(&self, batch: &mut WriteBatch, account: &AccountId, value: &Account) {
        batch.put_account(*account, value.record());
    }

    fn load(&self, handle: Handle) -> StakingResult<EncryptedAmount> {
        if handle.is_zero() {
            return Ok(self.zero.clone());
        }
        self.backend
            .ciphertext(&handle)?
            .ok_or(StakingError::UnknownHandle(handle))
    }
}

/// Per-account mutual exclusion.
///
/// Operations on one account run one at a time for their whole
/// read-accrue-mutate-commit sequence; different accounts never contend
/// beyond the brief slot lookup.
#[derive(Default)]
pub struct AccountLocks {
    slots: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the account's lock
    pub fn with<R>(&self, account: &AccountId, f: impl FnOnce() -> R) -> R {
        let slot = self.slots.lock().entry(*account).or_default().clone();
        let result = {
            let _guard = slot.lock();
            f()
        };

        // Clones are only taken under the map lock, so a count of two means
        // the map entry and this call are the last users
        let mut slots = self.slots.lock();
        if Arc::strong_count(&slot) == 2 {
            slots.remove(account);
        }
        result
    }

    /// Accounts with an operation in flight or waiting
    pub fn active(&self) -> usize {
        self.slots.lock().len()
    }
}
