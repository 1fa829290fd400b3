//! Confidential reward token
//!
//! Claimed rewards leave the engine as an encrypted credit. The token only
//! ever adds ciphertexts, so it never needs to decrypt either.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use zstake_fhe::FHEServer;

use crate::backend::{Acl, TokenBackend, TokenCredit};
use crate::errors::{StakingError, StakingResult};
use crate::types::{AccountId, ClaimId, EncryptedAmount, Handle};

/// Token interface the engine credits claimed rewards to
pub trait ConfidentialToken: Send + Sync {
    /// Add `amount` to the balance of `to`.
    ///
    /// Idempotent per `claim`: a repeated call leaves the balance alone and
    /// returns the current balance handle.
    fn credit_encrypted(
        &self,
        claim: ClaimId,
        to: &AccountId,
        amount: &EncryptedAmount,
    ) -> StakingResult<Handle>;

    fn is_credited(&self, claim: &ClaimId) -> StakingResult<bool>;

    /// Current balance handle, [`Handle::ZERO`] for holders never credited
    fn encrypted_balance_of(&self, holder: &AccountId) -> StakingResult<Handle>;
}

/// Mint-on-credit reference token
pub struct Zcoin<B> {
    backend: Arc<B>,
    fhe: FHEServer,
    credit_lock: Mutex<()>,
}

impl<B: TokenBackend> Zcoin<B> {
    pub fn new(backend: Arc<B>, fhe: FHEServer) -> Self {
        Self {
            backend,
            fhe,
            credit_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    fn current_balance(&self, holder: &AccountId) -> StakingResult<Option<EncryptedAmount>> {
        match self.backend.balance_handle(holder)? {
            None => Ok(None),
            Some(handle) => self
                .backend
                .ciphertext(&handle)?
                .map(Some)
                .ok_or(StakingError::UnknownHandle(handle)),
        }
    }
}

impl<B: TokenBackend> ConfidentialToken for Zcoin<B> {
    fn credit_encrypted(
        &self,
        claim: ClaimId,
        to: &AccountId,
        amount: &EncryptedAmount,
    ) -> StakingResult<Handle> {
        let _guard = self.credit_lock.lock();

        if self.backend.is_credited(&claim)? {
            debug!(?claim, account = %to, "claim already credited");
            return self.encrypted_balance_of(to);
        }

        self.fhe.install();
        let previous = self.current_balance(to)?;
        let value = match &previous {
            Some(balance) => self.fhe.add(&balance.value, &amount.value),
            None => (*amount.value).clone(),
        };
        let balance = EncryptedAmount::fresh(value);
        let handle = balance.handle;

        self.backend.commit_credit(TokenCredit {
            claim,
            to: *to,
            balance,
            acl: Acl::owner(*to),
            retired: previous.map(|b| b.handle),
        })?;

        info!(?claim, account = %to, balance = %handle, "credited reward");
        Ok(handle)
    }

    fn is_credited(&self, claim: &ClaimId) -> StakingResult<bool> {
        self.backend.is_credited(claim)
    }

    fn encrypted_balance_of(&self, holder: &AccountId) -> StakingResult<Handle> {
        Ok(self.backend.balance_handle(holder)?.unwrap_or(Handle::ZERO))
    }
}
