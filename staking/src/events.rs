//! Observable staking events
//!
//! Events are appended in the same atomic commit as the state change they
//! describe, so their order is the commit order.

use serde::{Deserialize, Serialize};

use crate::types::AccountId;

/// One successful mutating operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingEvent {
    /// Whole units added to the account's stake
    Staked { account: AccountId, units: u64 },
    /// Whole units released back to the account
    Withdrawn { account: AccountId, units: u64 },
    /// Pending reward credited to the confidential token.
    ///
    /// The engine never learns the plaintext reward, so `amount` is only set by
    /// hosts that can expose it.
    RewardClaimed { account: AccountId, amount: Option<u64> },
}

impl StakingEvent {
    pub fn account(&self) -> &AccountId {
        match self {
            StakingEvent::Staked { account, .. }
            | StakingEvent::Withdrawn { account, .. }
            | StakingEvent::RewardClaimed { account, .. } => account,
        }
    }
}

/// Event with its position in the global log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub event: StakingEvent,
}
