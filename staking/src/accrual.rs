//! Time-proportional reward accrual
//!
//! Reward for a period is `stake * REWARD_RATE * elapsed / SECONDS_PER_DAY`,
//! truncated, evaluated homomorphically on the encrypted stake. Every
//! branch is taken on plaintext data: the timestamps and the `stake_units`
//! mirror.

use tracing::debug;
use zstake_fhe::{ElapsedFactor, FHEServer};

use crate::errors::{StakingError, StakingResult};
use crate::ledger::Account;
use crate::types::EncryptedAmount;
use crate::REWARD_RATE;

/// Bring `account` up to `now`.
///
/// Returns the updated copy; the input is left alone so a later failure in
/// the calling operation discards the accrual too. The reward keeps its
/// handle when nothing was added.
pub fn accrue(fhe: &FHEServer, account: &Account, now: u64) -> StakingResult<Account> {
    let last = account.last_accrual;
    if last != 0 && now < last {
        return Err(StakingError::ClockRegression { last, now });
    }

    let mut next = account.clone();
    next.last_accrual = now;

    if last == 0 || !account.is_staked() {
        return Ok(next);
    }

    let elapsed = now - last;
    if elapsed == 0 {
        return Ok(next);
    }

    let factor = ElapsedFactor::split(REWARD_RATE, elapsed)?;
    let expected = factor
        .apply_plain(account.stake_units)
        .ok_or(StakingError::Overflow)?;

    let delta = fhe.scale_by_elapsed_time(&account.encrypted_stake.value, elapsed, REWARD_RATE)?;
    next.encrypted_reward = EncryptedAmount::fresh(fhe.add(&account.encrypted_reward.value, &delta));

    debug!(
        units = account.stake_units,
        elapsed,
        expected,
        "accrued reward"
    );

    Ok(next)
}

/// Plaintext reward for `stake_units` held over `elapsed` seconds.
///
/// `None` when the result does not fit in 64 bits.
pub fn expected_reward(stake_units: u64, elapsed: u64) -> Option<u64> {
    ElapsedFactor::split(REWARD_RATE, elapsed)
        .ok()?
        .apply_plain(stake_units)
}
