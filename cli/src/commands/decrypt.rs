//! Decrypt Commands - ACL-checked local decryption

use clap::Args;

use crate::node::Node;

/// Which of the account's ciphertexts to decrypt
#[derive(Debug, Clone, Copy)]
pub enum DecryptTarget {
    Stake,
    Reward,
    Balance,
}

/// Decrypt one of an account's ciphertexts
#[derive(Args)]
pub struct DecryptCommand {
    /// Identity asking for the plaintext; defaults to the account itself
    #[arg(long)]
    requester: Option<String>,
}

impl DecryptCommand {
    pub fn execute(
        self,
        target: DecryptTarget,
        node: &Node,
        account: Option<&str>,
    ) -> anyhow::Result<()> {
        let owner = node.account(account)?;
        let requester = match self.requester {
            Some(hex) => zstake_staking::AccountId::from_hex(&hex)?,
            None => owner,
        };

        let handle = match target {
            DecryptTarget::Stake => node.engine.encrypted_stake_of(&owner)?,
            DecryptTarget::Reward => node.engine.encrypted_rewards_of(&owner)?,
            DecryptTarget::Balance => node.engine.encrypted_balance_of(&owner)?,
        };
        let value = node.decryption.user_decrypt(&handle, &requester)?;

        match target {
            DecryptTarget::Stake => println!("Staked: {} units", value),
            DecryptTarget::Reward => println!("Pending reward: {}", format_reward(value)),
            DecryptTarget::Balance => println!("Token balance: {}", format_reward(value)),
        }
        Ok(())
    }
}

/// Reward base units as a decimal token amount
fn format_reward(value: u64) -> String {
    let scale = 10u64.pow(zstake_staking::REWARD_DECIMALS);
    format!(
        "{}.{:0width$} ZCOIN",
        value / scale,
        value % scale,
        width = zstake_staking::REWARD_DECIMALS as usize
    )
}
