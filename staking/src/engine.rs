//! Staking engine
//!
//! Every mutating operation follows the same shape under the caller's
//! account lock:
//!
//! 1. settle any claim a previous run left half-finished
//! 2. load the account and accrue it to `now`
//! 3. validate and mutate a local copy
//! 4. stage the new ciphertexts, retired handles, record and event in one
//!    [`WriteBatch`] and commit it
//!
//! Nothing is written before step 4, so a rejected operation leaves no trace.

use std::sync::Arc;

use tracing::{debug, info, warn};
use zstake_fhe::FHEServer;

use crate::accrual::accrue;
use crate::backend::{AccountRecord, Acl, PendingClaim, StateBackend, WriteBatch};
use crate::clock::Clock;
use crate::errors::{StakingError, StakingResult};
use crate::events::{EventRecord, StakingEvent};
use crate::ledger::{Account, AccountLedger, AccountLocks};
use crate::token::ConfidentialToken;
use crate::types::{AccountId, ClaimId, EncryptedAmount, Handle};
use crate::STAKE_UNIT;

/// Payout the host escrow must make after a successful withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    pub to: AccountId,
    /// Base-asset denomination
    pub value: u128,
}

/// Convert a base-denomination amount to whole stake units
fn whole_units(value: u128) -> StakingResult<u64> {
    if value % STAKE_UNIT != 0 {
        return Err(StakingError::NotWholeUnit {
            value,
            unit: STAKE_UNIT,
        });
    }
    u64::try_from(value / STAKE_UNIT).map_err(|_| StakingError::Overflow)
}

pub struct StakingEngine<B, T, C> {
    backend: Arc<B>,
    token: Arc<T>,
    clock: C,
    fhe: FHEServer,
    ledger: AccountLedger<B>,
    locks: AccountLocks,
}

impl<B, T, C> StakingEngine<B, T, C>
where
    B: StateBackend,
    T: ConfidentialToken,
    C: Clock,
{
    /// Open an engine over `backend`, storing the canonical zero on first use
    pub fn new(backend: Arc<B>, token: Arc<T>, fhe: FHEServer, clock: C) -> StakingResult<Self> {
        fhe.install();

        let zero = match backend.ciphertext(&Handle::ZERO)? {
            Some(zero) => zero,
            None => {
                let zero = EncryptedAmount::new(Handle::ZERO, fhe.zero()?);
                let mut batch = WriteBatch::new();
                batch.put_ciphertext(zero.clone(), Acl::public());
                backend.commit(batch)?;
                debug!("stored canonical encrypted zero");
                zero
            }
        };

        Ok(Self {
            ledger: AccountLedger::new(backend.clone(), zero),
            backend,
            token,
            clock,
            fhe,
            locks: AccountLocks::new(),
        })
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn token(&self) -> &Arc<T> {
        &self.token
    }

    pub fn fhe(&self) -> &FHEServer {
        &self.fhe
    }

    /// Stake `value` base-denomination units of the base asset.
    ///
    /// The host has already escrowed `value` from the caller.
    pub fn stake(&self, caller: &AccountId, value: u128) -> StakingResult<()> {
        if value == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let units = whole_units(value)?;

        self.locks.with(caller, || {
            self.fhe.install();
            self.settle_pending(caller)?;

            let now = self.clock.now();
            let current = self.ledger.get(caller)?;
            let mut next = accrue(&self.fhe, &current, now)?;

            next.stake_units = next
                .stake_units
                .checked_add(units)
                .ok_or(StakingError::Overflow)?;
            let added = self.fhe.encrypt_amount(units)?;
            next.encrypted_stake =
                EncryptedAmount::fresh(self.fhe.add(&next.encrypted_stake.value, &added));

            let mut batch = WriteBatch::new();
            self.stage(&mut batch, caller, &current, &next);
            batch.emit(StakingEvent::Staked {
                account: *caller,
                units,
            });
            self.backend.commit(batch)?;

            info!(account = %caller, units, total = next.stake_units, "staked");
            Ok(())
        })
    }

    /// Withdraw `value` base-denomination units of stake
    pub fn withdraw(&self, caller: &AccountId, value: u128) -> StakingResult<Release> {
        let units = whole_units(value)?;

        self.locks.with(caller, || {
            self.fhe.install();
            self.settle_pending(caller)?;

            let now = self.clock.now();
            let current = self.ledger.get(caller)?;
            if units == 0 || units > current.stake_units {
                return Err(StakingError::InsufficientStake {
                    requested: units,
                    available: current.stake_units,
                });
            }

            let mut next = accrue(&self.fhe, &current, now)?;
            next.stake_units -= units;
            let removed = self.fhe.encrypt_amount(units)?;
            next.encrypted_stake =
                EncryptedAmount::fresh(self.fhe.sub(&next.encrypted_stake.value, &removed));

            let mut batch = WriteBatch::new();
            self.stage(&mut batch, caller, &current, &next);
            batch.emit(StakingEvent::Withdrawn {
                account: *caller,
                units,
            });
            self.backend.commit(batch)?;

            info!(account = %caller, units, remaining = next.stake_units, "withdrew");
            Ok(Release { to: *caller, value })
        })
    }

    /// Move the whole accrued reward to the caller's token balance.
    ///
    /// Returns the caller's new token balance handle.
    pub fn claim_rewards(&self, caller: &AccountId) -> StakingResult<Handle> {
        self.locks.with(caller, || {
            self.fhe.install();
            self.settle_pending(caller)?;

            let now = self.clock.now();
            let current = self.ledger.get(caller)?;
            let accrued = accrue(&self.fhe, &current, now)?;

            let claim = PendingClaim {
                id: ClaimId::random(),
                account: *caller,
                reward: accrued.encrypted_reward.handle,
                started_at: now,
            };

            let mut batch = WriteBatch::new();
            self.stage(&mut batch, caller, &current, &accrued);
            batch.begin_claim(claim);
            self.backend.commit(batch)?;
            debug!(account = %caller, claim = ?claim.id, "claim journaled");

            let balance = match self
                .token
                .credit_encrypted(claim.id, caller, &accrued.encrypted_reward)
            {
                Ok(balance) => balance,
                Err(e) => match self.token.is_credited(&claim.id) {
                    Ok(true) => self.token.encrypted_balance_of(caller)?,
                    Ok(false) => {
                        // Roll the accrual back with the journal entry
                        let mut batch = WriteBatch::new();
                        self.stage(&mut batch, caller, &accrued, &current);
                        batch.finish_claim(claim.id);
                        self.backend.commit(batch)?;
                        warn!(account = %caller, error = %e, "claim rejected, account restored");
                        return Err(e);
                    }
                    Err(_) => {
                        warn!(account = %caller, error = %e, "claim left pending");
                        return Err(e);
                    }
                },
            };

            self.complete_claim(&claim, &accrued)?;
            info!(account = %caller, balance = %balance, "claimed rewards");
            Ok(balance)
        })
    }

    /// Finish every claim a previous run left journaled.
    ///
    /// Returns the number of journal entries resolved.
    pub fn recover_pending_claims(&self) -> StakingResult<usize> {
        let mut count = 0;
        for claim in self.backend.pending_claims()? {
            if self.recover_claim(&claim)? {
                count += 1;
            }
        }

        if count > 0 {
            info!(count, "recovered pending claims");
        }
        Ok(count)
    }

    /// Settle `claim` unless another operation already resolved it
    fn recover_claim(&self, claim: &PendingClaim) -> StakingResult<bool> {
        self.locks.with(&claim.account, || {
            let journaled = self
                .backend
                .pending_claims()?
                .iter()
                .any(|pending| pending.id == claim.id);
            if !journaled {
                return Ok(false);
            }

            self.fhe.install();
            self.settle(claim)?;
            Ok(true)
        })
    }

    pub fn encrypted_stake_of(&self, account: &AccountId) -> StakingResult<Handle> {
        Ok(self.account(account)?.stake)
    }

    pub fn encrypted_rewards_of(&self, account: &AccountId) -> StakingResult<Handle> {
        Ok(self.account(account)?.reward)
    }

    /// 0 for accounts that never staked
    pub fn last_accrual_of(&self, account: &AccountId) -> StakingResult<u64> {
        Ok(self.account(account)?.last_accrual)
    }

    pub fn stake_units_of(&self, account: &AccountId) -> StakingResult<u64> {
        Ok(self.account(account)?.stake_units)
    }

    /// Snapshot of the stored record. Does not accrue.
    pub fn account(&self, account: &AccountId) -> StakingResult<AccountRecord> {
        self.locks.with(account, || self.ledger.record(account))
    }

    pub fn encrypted_balance_of(&self, account: &AccountId) -> StakingResult<Handle> {
        self.locks
            .with(account, || self.token.encrypted_balance_of(account))
    }

    pub fn events_since(&self, from_seq: u64) -> StakingResult<Vec<EventRecord>> {
        self.backend.events_since(from_seq)
    }

    /// Stage the ciphertexts and record that turn `before` into `after`
    fn stage(&self, batch: &mut WriteBatch, account: &AccountId, before: &Account, after: &Account) {
        let pairs = [
            (&before.encrypted_stake, &after.encrypted_stake),
            (&before.encrypted_reward, &after.encrypted_reward),
        ];
        for (old, new) in pairs {
            if old.handle == new.handle {
                continue;
            }
            if !new.handle.is_zero() {
                batch.put_ciphertext(new.clone(), Acl::owner(*account));
            }
            batch.retire(old.handle);
        }
        self.ledger.put(batch, account, after);
    }

    /// Reset the credited reward and close the journal entry
    fn complete_claim(&self, claim: &PendingClaim, credited: &Account) -> StakingResult<()> {
        let mut next = credited.clone();
        next.encrypted_reward = self.ledger.zero().clone();

        let mut batch = WriteBatch::new();
        self.stage(&mut batch, &claim.account, credited, &next);
        batch.finish_claim(claim.id);
        batch.emit(StakingEvent::RewardClaimed {
            account: claim.account,
            amount: None,
        });
        self.backend.commit(batch)
    }

    fn settle_pending(&self, account: &AccountId) -> StakingResult<()> {
        let pending = self.backend.pending_claims()?;
        for claim in pending.iter().filter(|c| c.account == *account) {
            self.settle(claim)?;
        }
        Ok(())
    }

    /// Caller holds the account lock
    fn settle(&self, claim: &PendingClaim) -> StakingResult<()> {
        let current = self.ledger.get(&claim.account)?;
        let still_owed = current.encrypted_reward.handle == claim.reward;

        let mut credited = self.token.is_credited(&claim.id)?;
        if !credited && still_owed {
            self.token
                .credit_encrypted(claim.id, &claim.account, &current.encrypted_reward)?;
            credited = true;
        }

        if credited && still_owed {
            self.complete_claim(claim, &current)?;
            info!(account = %claim.account, claim = ?claim.id, "settled pending claim");
            return Ok(());
        }

        if credited {
            warn!(account = %claim.account, claim = ?claim.id, "credited claim no longer matches account reward");
        }
        let mut batch = WriteBatch::new();
        batch.finish_claim(claim.id);
        self.backend.commit(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CiphertextSource;
    use crate::clock::ManualClock;
    use crate::decryption::DecryptionService;
    use crate::memory::MemoryBackend;
    use crate::test_support::{server, KEYS};
    use crate::token::Zcoin;
    use std::sync::atomic::{AtomicBool, Ordering};

    const DAY: u64 = 86_400;
    const START: u64 = 1_700_000_000;

    type Engine = StakingEngine<MemoryBackend, Zcoin<MemoryBackend>, Arc<ManualClock>>;

    struct Harness {
        engine: Engine,
        clock: Arc<ManualClock>,
        backend: Arc<MemoryBackend>,
        decrypt: DecryptionService<MemoryBackend>,
    }

    fn harness() -> Harness {
        let fhe = server();
        let backend = Arc::new(MemoryBackend::new());
        let token = Arc::new(Zcoin::new(backend.clone(), fhe.clone()));
        let clock = Arc::new(ManualClock::new(START));
        let engine = StakingEngine::new(backend.clone(), token, fhe, clock.clone()).unwrap();
        let decrypt = DecryptionService::new(KEYS.client.clone(), backend.clone());
        Harness {
            engine,
            clock,
            backend,
            decrypt,
        }
    }

    fn units(n: u128) -> u128 {
        n * STAKE_UNIT
    }

    impl Harness {
        fn stake_of(&self, who: &AccountId) -> u64 {
            let handle = self.engine.encrypted_stake_of(who).unwrap();
            self.decrypt.user_decrypt(&handle, who).unwrap()
        }

        fn reward_of(&self, who: &AccountId) -> u64 {
            let handle = self.engine.encrypted_rewards_of(who).unwrap();
            self.decrypt.user_decrypt(&handle, who).unwrap()
        }

        fn balance_of(&self, who: &AccountId) -> u64 {
            let handle = self.engine.encrypted_balance_of(who).unwrap();
            self.decrypt.user_decrypt(&handle, who).unwrap()
        }
    }

    #[test]
    fn test_rejects_zero_and_fractional_stake() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        assert!(matches!(h.engine.stake(&alice, 0), Err(StakingError::ZeroAmount)));
        assert!(matches!(
            h.engine.stake(&alice, STAKE_UNIT + 1),
            Err(StakingError::NotWholeUnit { unit: STAKE_UNIT, .. })
        ));
        assert_eq!(h.engine.last_accrual_of(&alice).unwrap(), 0);
        assert!(h.engine.events_since(0).unwrap().is_empty());
    }

    #[test]
    fn test_stake_and_claim_one_day() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(2)).unwrap();
        assert_eq!(h.stake_of(&alice), 2);
        assert_eq!(h.engine.last_accrual_of(&alice).unwrap(), START);

        h.clock.advance(DAY);
        h.engine.claim_rewards(&alice).unwrap();

        assert_eq!(h.balance_of(&alice), 2_000_000_000);
        assert_eq!(h.reward_of(&alice), 0);
        assert!(h.engine.encrypted_rewards_of(&alice).unwrap().is_zero());
        assert!(h.backend.pending_claims().unwrap().is_empty());

        let events: Vec<_> = h.engine.events_since(0).unwrap().into_iter().map(|r| r.event).collect();
        assert_eq!(
            events,
            vec![
                StakingEvent::Staked { account: alice, units: 2 },
                StakingEvent::RewardClaimed { account: alice, amount: None },
            ]
        );
    }

    #[test]
    fn test_withdraw_then_insufficient() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(2)).unwrap();
        let release = h.engine.withdraw(&alice, units(1)).unwrap();
        assert_eq!(release, Release { to: alice, value: units(1) });
        assert_eq!(h.stake_of(&alice), 1);

        let before = h.engine.account(&alice).unwrap();
        assert!(matches!(
            h.engine.withdraw(&alice, units(2)),
            Err(StakingError::InsufficientStake { requested: 2, available: 1 })
        ));
        assert_eq!(h.engine.account(&alice).unwrap(), before);
        assert_eq!(h.stake_of(&alice), 1);
    }

    #[test]
    fn test_withdraw_zero_is_insufficient() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(1)).unwrap();
        assert!(matches!(
            h.engine.withdraw(&alice, 0),
            Err(StakingError::InsufficientStake { requested: 0, available: 1 })
        ));
    }

    #[test]
    fn test_withdraw_keeps_accrued_reward() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(1)).unwrap();
        h.clock.advance(DAY);
        h.engine.withdraw(&alice, units(1)).unwrap();
        h.clock.advance(DAY);

        assert_eq!(h.engine.stake_units_of(&alice).unwrap(), 0);
        assert_eq!(h.reward_of(&alice), 1_000_000_000);

        h.engine.claim_rewards(&alice).unwrap();
        assert_eq!(h.balance_of(&alice), 1_000_000_000);
    }

    #[test]
    fn test_claim_with_no_elapsed_time() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(5)).unwrap();
        h.engine.claim_rewards(&alice).unwrap();

        assert_eq!(h.balance_of(&alice), 0);
        assert_eq!(h.reward_of(&alice), 0);
    }

    #[test]
    fn test_never_staked_account() {
        let h = harness();
        let bob = AccountId([2u8; 32]);

        assert_eq!(h.engine.last_accrual_of(&bob).unwrap(), 0);
        assert_eq!(h.engine.stake_units_of(&bob).unwrap(), 0);
        assert_eq!(h.reward_of(&bob), 0);
        assert_eq!(h.balance_of(&bob), 0);
        assert_eq!(h.engine.locks.active(), 0);
    }

    #[test]
    fn test_queries_are_stable() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(3)).unwrap();
        h.clock.advance(DAY);

        let first = h.engine.account(&alice).unwrap();
        let second = h.engine.account(&alice).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.last_accrual, START);
        assert_eq!(h.engine.encrypted_stake_of(&alice).unwrap(), first.stake);
    }

    #[test]
    fn test_clock_regression_leaves_state() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(1)).unwrap();
        let before = h.engine.account(&alice).unwrap();

        h.clock.set(START - 10);
        assert!(matches!(
            h.engine.stake(&alice, units(1)),
            Err(StakingError::ClockRegression { last: START, now }) if now == START - 10
        ));
        assert_eq!(h.engine.account(&alice).unwrap(), before);
    }

    #[test]
    fn test_replaced_ciphertexts_are_retired() {
        let h = harness();
        let alice = AccountId([1u8; 32]);

        h.engine.stake(&alice, units(1)).unwrap();
        let old = h.engine.encrypted_stake_of(&alice).unwrap();
        h.engine.stake(&alice, units(1)).unwrap();

        assert!(h.backend.ciphertext(&old).unwrap().is_none());
        // zero + stake
        assert_eq!(h.backend.ciphertext_count(), 2);
    }

    #[test]
    fn test_other_accounts_cannot_decrypt() {
        let h = harness();
        let alice = AccountId([1u8; 32]);
        let mallory = AccountId([6u8; 32]);

        h.engine.stake(&alice, units(1)).unwrap();
        let handle = h.engine.encrypted_stake_of(&alice).unwrap();

        assert!(matches!(
            h.decrypt.user_decrypt(&handle, &mallory),
            Err(StakingError::UnauthorizedDecryption { .. })
        ));
    }

    /// Token whose backend can be taken offline
    struct FlakyToken {
        inner: Zcoin<MemoryBackend>,
        online: AtomicBool,
    }

    impl FlakyToken {
        fn check(&self) -> StakingResult<()> {
            if self.online.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(StakingError::Backend("token offline".into()))
            }
        }
    }

    impl ConfidentialToken for FlakyToken {
        fn credit_encrypted(&self, claim: ClaimId, to: &AccountId, amount: &EncryptedAmount) -> StakingResult<Handle> {
            self.check()?;
            self.inner.credit_encrypted(claim, to, amount)
        }

        fn is_credited(&self, claim: &ClaimId) -> StakingResult<bool> {
            self.check()?;
            self.inner.is_credited(claim)
        }

        fn encrypted_balance_of(&self, holder: &AccountId) -> StakingResult<Handle> {
            self.inner.encrypted_balance_of(holder)
        }
    }

    fn flaky_engine() -> (
        StakingEngine<MemoryBackend, FlakyToken, Arc<ManualClock>>,
        Arc<FlakyToken>,
        Arc<ManualClock>,
        Arc<MemoryBackend>,
    ) {
        let fhe = server();
        let backend = Arc::new(MemoryBackend::new());
        let token = Arc::new(FlakyToken {
            inner: Zcoin::new(backend.clone(), fhe.clone()),
            online: AtomicBool::new(true),
        });
        let clock = Arc::new(ManualClock::new(START));
        let engine = StakingEngine::new(backend.clone(), token.clone(), fhe, clock.clone()).unwrap();
        (engine, token, clock, backend)
    }

    #[test]
    fn test_interrupted_claim_is_recovered_once() {
        let (engine, token, clock, backend) = flaky_engine();
        let decrypt = DecryptionService::new(KEYS.client.clone(), backend.clone());
        let alice = AccountId([1u8; 32]);

        engine.stake(&alice, units(2)).unwrap();
        clock.advance(DAY);

        token.online.store(false, Ordering::SeqCst);
        assert!(engine.claim_rewards(&alice).is_err());
        assert_eq!(backend.pending_claims().unwrap().len(), 1);

        token.online.store(true, Ordering::SeqCst);
        assert_eq!(engine.recover_pending_claims().unwrap(), 1);
        assert_eq!(engine.recover_pending_claims().unwrap(), 0);

        let balance = engine.encrypted_balance_of(&alice).unwrap();
        assert_eq!(decrypt.user_decrypt(&balance, &alice).unwrap(), 2_000_000_000);
        assert!(engine.encrypted_rewards_of(&alice).unwrap().is_zero());
    }

    #[test]
    fn test_recovery_skips_claim_settled_meanwhile() {
        let (engine, token, _clock, backend) = flaky_engine();
        let alice = AccountId([1u8; 32]);

        // No time elapses, so the journaled reward is the shared zero handle
        engine.stake(&alice, units(1)).unwrap();
        token.online.store(false, Ordering::SeqCst);
        assert!(engine.claim_rewards(&alice).is_err());

        let stale = backend.pending_claims().unwrap();
        assert_eq!(stale.len(), 1);
        assert!(stale[0].reward.is_zero());

        token.online.store(true, Ordering::SeqCst);
        engine.stake(&alice, units(1)).unwrap();
        assert!(backend.pending_claims().unwrap().is_empty());

        assert!(!engine.recover_claim(&stale[0]).unwrap());

        let claims = engine
            .events_since(0)
            .unwrap()
            .into_iter()
            .filter(|r| matches!(r.event, StakingEvent::RewardClaimed { .. }))
            .count();
        assert_eq!(claims, 1);
    }

    /// Token that refuses credits outright and reports them as not landed
    struct RejectingToken {
        inner: Zcoin<MemoryBackend>,
        reject: AtomicBool,
    }

    impl ConfidentialToken for RejectingToken {
        fn credit_encrypted(&self, claim: ClaimId, to: &AccountId, amount: &EncryptedAmount) -> StakingResult<Handle> {
            if self.reject.load(Ordering::SeqCst) {
                return Err(StakingError::Backend("credit rejected".into()));
            }
            self.inner.credit_encrypted(claim, to, amount)
        }

        fn is_credited(&self, claim: &ClaimId) -> StakingResult<bool> {
            self.inner.is_credited(claim)
        }

        fn encrypted_balance_of(&self, holder: &AccountId) -> StakingResult<Handle> {
            self.inner.encrypted_balance_of(holder)
        }
    }

    #[test]
    fn test_rejected_claim_leaves_account() {
        let fhe = server();
        let backend = Arc::new(MemoryBackend::new());
        let token = Arc::new(RejectingToken {
            inner: Zcoin::new(backend.clone(), fhe.clone()),
            reject: AtomicBool::new(false),
        });
        let clock = Arc::new(ManualClock::new(START));
        let engine = StakingEngine::new(backend.clone(), token.clone(), fhe, clock.clone()).unwrap();
        let decrypt = DecryptionService::new(KEYS.client.clone(), backend.clone());
        let alice = AccountId([1u8; 32]);

        engine.stake(&alice, units(3)).unwrap();
        clock.advance(7);
        let before = engine.account(&alice).unwrap();
        let live = backend.ciphertext_count();

        token.reject.store(true, Ordering::SeqCst);
        assert!(engine.claim_rewards(&alice).is_err());
        assert_eq!(engine.account(&alice).unwrap(), before);
        assert_eq!(backend.ciphertext_count(), live);
        assert!(backend.pending_claims().unwrap().is_empty());

        // 3 * 10^9 * 14 / 86400, not two truncated 7-second slices
        token.reject.store(false, Ordering::SeqCst);
        clock.advance(7);
        engine.claim_rewards(&alice).unwrap();
        let balance = engine.encrypted_balance_of(&alice).unwrap();
        assert_eq!(decrypt.user_decrypt(&balance, &alice).unwrap(), 486_111);
    }

    #[test]
    fn test_next_operation_settles_pending_claim() {
        let (engine, token, clock, backend) = flaky_engine();
        let decrypt = DecryptionService::new(KEYS.client.clone(), backend.clone());
        let alice = AccountId([1u8; 32]);

        engine.stake(&alice, units(1)).unwrap();
        clock.advance(DAY);

        token.online.store(false, Ordering::SeqCst);
        assert!(engine.claim_rewards(&alice).is_err());

        token.online.store(true, Ordering::SeqCst);
        engine.stake(&alice, units(1)).unwrap();

        assert!(backend.pending_claims().unwrap().is_empty());
        let balance = engine.encrypted_balance_of(&alice).unwrap();
        assert_eq!(decrypt.user_decrypt(&balance, &alice).unwrap(), 1_000_000_000);
        assert_eq!(engine.stake_units_of(&alice).unwrap(), 2);
    }
}
