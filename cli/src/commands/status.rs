//! Status Command - Show account and store status

use clap::Args;

use crate::node::Node;

/// Show account status
#[derive(Args)]
pub struct StatusCommand {
    /// Also list events starting at this sequence number
    #[arg(long)]
    events_from: Option<u64>,
}

impl StatusCommand {
    pub fn execute(self, node: &Node, account: Option<&str>) -> anyhow::Result<()> {
        let stats = node.store.stats()?;

        println!("Database:       {}", stats.path.display());
        println!("Accounts:       {}", stats.accounts);
        println!("Ciphertexts:    {}", stats.ciphertexts);
        println!("Events:         {}", stats.events);
        println!("Pending claims: {}", stats.pending_claims);

        if let Some(caller) = node.optional_account(account)? {
            let record = node.engine.account(&caller)?;
            println!();
            println!("Account:        {}", caller.to_hex());
            println!("Staked units:   {}", record.stake_units);
            println!("Last accrual:   {}", record.last_accrual);
            println!("Stake handle:   {}", record.stake);
            println!("Reward handle:  {}", record.reward);
            println!("Balance handle: {}", node.engine.encrypted_balance_of(&caller)?);
        }

        if let Some(from) = self.events_from {
            println!();
            for record in node.engine.events_since(from)? {
                println!("#{:<6} {:?}", record.seq, record.event);
            }
        }

        Ok(())
    }
}
