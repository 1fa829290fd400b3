//! In-memory backend
//!
//! One `RwLock` over the whole state: a commit is a single write section, so
//! readers observe either all of a batch or none of it.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;

use crate::backend::{
    AccountRecord, Acl, CiphertextSource, PendingClaim, StateBackend, TokenBackend, TokenCredit,
    WriteBatch,
};
use crate::errors::StakingResult;
use crate::events::EventRecord;
use crate::types::{AccountId, ClaimId, EncryptedAmount, Handle};

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<AccountId, AccountRecord>,
    ciphertexts: HashMap<Handle, (EncryptedAmount, Acl)>,
    claims: BTreeMap<ClaimId, PendingClaim>,
    events: Vec<EventRecord>,
    balances: HashMap<AccountId, Handle>,
    credited: HashSet<ClaimId>,
}

/// Backend for tests and single-process hosts
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live ciphertexts
    pub fn ciphertext_count(&self) -> usize {
        self.state.read().ciphertexts.len()
    }
}

impl CiphertextSource for MemoryBackend {
    fn ciphertext(&self, handle: &Handle) -> StakingResult<Option<EncryptedAmount>> {
        Ok(self.state.read().ciphertexts.get(handle).map(|(ct, _)| ct.clone()))
    }

    fn acl(&self, handle: &Handle) -> StakingResult<Option<Acl>> {
        Ok(self.state.read().ciphertexts.get(handle).map(|(_, acl)| acl.clone()))
    }
}

impl StateBackend for MemoryBackend {
    fn account(&self, account: &AccountId) -> StakingResult<Option<AccountRecord>> {
        Ok(self.state.read().accounts.get(account).copied())
    }

    fn commit(&self, batch: WriteBatch) -> StakingResult<()> {
        let mut state = self.state.write();

        for (amount, acl) in batch.ciphertexts {
            state.ciphertexts.insert(amount.handle, (amount, acl));
        }
        for handle in batch.retired {
            state.ciphertexts.remove(&handle);
        }
        for (account, record) in batch.accounts {
            state.accounts.insert(account, record);
        }
        for claim in batch.claims_started {
            state.claims.insert(claim.id, claim);
        }
        for id in batch.claims_finished {
            state.claims.remove(&id);
        }
        for event in batch.events {
            let seq = state.events.len() as u64;
            state.events.push(EventRecord { seq, event });
        }

        Ok(())
    }

    fn pending_claims(&self) -> StakingResult<Vec<PendingClaim>> {
        Ok(self.state.read().claims.values().copied().collect())
    }

    fn events_since(&self, from_seq: u64) -> StakingResult<Vec<EventRecord>> {
        let state = self.state.read();
        let start = (from_seq as usize).min(state.events.len());
        Ok(state.events[start..].to_vec())
    }
}

impl TokenBackend for MemoryBackend {
    fn balance_handle(&self, holder: &AccountId) -> StakingResult<Option<Handle>> {
        Ok(self.state.read().balances.get(holder).copied())
    }

    fn is_credited(&self, claim: &ClaimId) -> StakingResult<bool> {
        Ok(self.state.read().credited.contains(claim))
    }

    fn commit_credit(&self, credit: TokenCredit) -> StakingResult<()> {
        let mut state = self.state.write();

        let handle = credit.balance.handle;
        state.ciphertexts.insert(handle, (credit.balance, credit.acl));
        if let Some(old) = credit.retired.filter(|h| !h.is_zero()) {
            state.ciphertexts.remove(&old);
        }
        state.balances.insert(credit.to, handle);
        state.credited.insert(credit.claim);

        Ok(())
    }
}
