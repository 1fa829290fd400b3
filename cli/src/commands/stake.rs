//! Stake, Withdraw and Claim Commands

use clap::Args;
use zstake_staking::STAKE_UNIT;

use crate::node::Node;

/// Stake whole units of the base asset
#[derive(Args)]
pub struct StakeCommand {
    /// Whole units to stake
    #[arg(short, long)]
    pub(crate) amount: u64,
}

impl StakeCommand {
    pub fn execute(self, node: &Node, account: Option<&str>) -> anyhow::Result<()> {
        let caller = node.account(account)?;
        node.engine.stake(&caller, self.amount as u128 * STAKE_UNIT)?;

        println!("Staked {} units for {}", self.amount, caller);
        println!("Total staked: {}", node.engine.stake_units_of(&caller)?);
        Ok(())
    }
}

/// Withdraw whole units of stake
#[derive(Args)]
pub struct WithdrawCommand {
    /// Whole units to withdraw
    #[arg(short, long)]
    pub(crate) amount: u64,
}

impl WithdrawCommand {
    pub fn execute(self, node: &Node, account: Option<&str>) -> anyhow::Result<()> {
        let caller = node.account(account)?;
        let release = node.engine.withdraw(&caller, self.amount as u128 * STAKE_UNIT)?;

        println!("Withdrew {} units for {}", self.amount, caller);
        println!("Release:      {} base units to {}", release.value, release.to);
        println!("Total staked: {}", node.engine.stake_units_of(&caller)?);
        Ok(())
    }
}

/// Claim accrued rewards to the reward token
#[derive(Args)]
pub struct ClaimCommand {}

impl ClaimCommand {
    pub fn execute(self, node: &Node, account: Option<&str>) -> anyhow::Result<()> {
        let caller = node.account(account)?;
        let balance = node.engine.claim_rewards(&caller)?;

        println!("Claimed rewards for {}", caller);
        println!("Balance handle: {}", balance);
        println!("Run `zstake decrypt-balance` to view it.");
        Ok(())
    }
}
