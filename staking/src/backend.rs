//! Storage seams between the engine and its host
//!
//! The engine never mutates state piecemeal. Each operation builds a
//! [`WriteBatch`] on a local copy and hands it to [`StateBackend::commit`],
//! which must apply it all-or-nothing. That commit is the only concurrency
//! primitive the engine needs beyond its per-account locks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::StakingResult;
use crate::events::{EventRecord, StakingEvent};
use crate::types::{AccountId, ClaimId, EncryptedAmount, Handle};

/// Who may request decryption of a stored ciphertext
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    pub public: bool,
    pub readers: BTreeSet<AccountId>,
}

impl Acl {
    /// Readable by everyone (only used for the canonical zero)
    pub fn public() -> Self {
        Self {
            public: true,
            readers: BTreeSet::new(),
        }
    }

    /// Readable by the owning account only
    pub fn owner(account: AccountId) -> Self {
        Self {
            public: false,
            readers: BTreeSet::from([account]),
        }
    }

    pub fn allows(&self, requester: &AccountId) -> bool {
        self.public || self.readers.contains(requester)
    }
}

/// Persisted form of an account: plaintext fields plus ciphertext handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub stake_units: u64,
    pub stake: Handle,
    pub reward: Handle,
    pub last_accrual: u64,
}

/// Claim whose token credit may not have landed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingClaim {
    pub id: ClaimId,
    pub account: AccountId,
    /// Reward ciphertext being credited
    pub reward: Handle,
    pub started_at: u64,
}

/// Everything one operation writes
#[derive(Debug, Default)]
pub struct WriteBatch {
    pub ciphertexts: Vec<(EncryptedAmount, Acl)>,
    pub retired: Vec<Handle>,
    pub accounts: Vec<(AccountId, AccountRecord)>,
    pub events: Vec<StakingEvent>,
    pub claims_started: Vec<PendingClaim>,
    pub claims_finished: Vec<ClaimId>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_ciphertext(&mut self, amount: EncryptedAmount, acl: Acl) {
        self.ciphertexts.push((amount, acl));
    }

    /// Drop a ciphertext nothing references any more. The zero handle is shared and never retired.
    pub fn retire(&mut self, handle: Handle) {
        if !handle.is_zero() {
            self.retired.push(handle);
        }
    }

    pub fn put_account(&mut self, account: AccountId, record: AccountRecord) {
        self.accounts.push((account, record));
    }

    pub fn emit(&mut self, event: StakingEvent) {
        self.events.push(event);
    }

    pub fn begin_claim(&mut self, claim: PendingClaim) {
        self.claims_started.push(claim);
    }

    pub fn finish_claim(&mut self, id: ClaimId) {
        self.claims_finished.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertexts.is_empty()
            && self.retired.is_empty()
            && self.accounts.is_empty()
            && self.events.is_empty()
            && self.claims_started.is_empty()
            && self.claims_finished.is_empty()
    }
}

/// Read access to stored ciphertexts and their ACLs
pub trait CiphertextSource: Send + Sync {
    fn ciphertext(&self, handle: &Handle) -> StakingResult<Option<EncryptedAmount>>;

    fn acl(&self, handle: &Handle) -> StakingResult<Option<Acl>>;
}

/// Ledger state owned by the staking engine
pub trait StateBackend: CiphertextSource {
    fn account(&self, account: &AccountId) -> StakingResult<Option<AccountRecord>>;

    /// Apply the batch atomically; on error nothing is applied
    fn commit(&self, batch: WriteBatch) -> StakingResult<()>;

    fn pending_claims(&self) -> StakingResult<Vec<PendingClaim>>;

    /// Events with `seq >= from_seq`, in commit order
    fn events_since(&self, from_seq: u64) -> StakingResult<Vec<EventRecord>>;
}

/// One credit applied to a confidential token balance
#[derive(Debug)]
pub struct TokenCredit {
    pub claim: ClaimId,
    pub to: AccountId,
    pub balance: EncryptedAmount,
    pub acl: Acl,
    /// Previous balance ciphertext, replaced by `balance`
    pub retired: Option<Handle>,
}

/// Balance state owned by a confidential token
pub trait TokenBackend: CiphertextSource {
    fn balance_handle(&self, holder: &AccountId) -> StakingResult<Option<Handle>>;

    fn is_credited(&self, claim: &ClaimId) -> StakingResult<bool>;

    /// Store the new balance and mark the claim credited, atomically
    fn commit_credit(&self, credit: TokenCredit) -> StakingResult<()>;
}
