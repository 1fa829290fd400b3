//! zstake CLI
//!
//! Command-line interface for a local confidential staking node.
//!
//! # Usage
//!
//! ```bash
//! # Generate keys and configuration
//! zstake init --account <hex>
//!
//! # Stake, withdraw and claim
//! zstake stake --amount 2
//! zstake withdraw --amount 1
//! zstake claim
//!
//! # Inspect
//! zstake status
//! zstake decrypt-reward
//! zstake decrypt-balance
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod node;

use commands::{
    ClaimCommand, DecryptCommand, DecryptTarget, InitCommand, StakeCommand, StatusCommand,
    WithdrawCommand,
};
use node::{Node, NodePaths};

/// zstake confidential staking node
#[derive(Parser)]
#[command(name = "zstake")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Confidential staking with FHE-encrypted balances", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(short, long, global = true, env = "ZSTAKE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Caller account (hex, 32 bytes)
    #[arg(long, global = true, env = "ZSTAKE_ACCOUNT")]
    account: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate keys and initialize a node
    Init(InitCommand),

    /// Stake whole units
    Stake(StakeCommand),

    /// Withdraw whole units
    Withdraw(WithdrawCommand),

    /// Claim accrued rewards
    Claim(ClaimCommand),

    /// Show account status
    Status(StatusCommand),

    /// Decrypt the account's stake
    DecryptStake(DecryptCommand),

    /// Decrypt the account's pending reward
    DecryptReward(DecryptCommand),

    /// Decrypt the account's reward token balance
    DecryptBalance(DecryptCommand),

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = NodePaths::new(cli.config, cli.data_dir);

    // Flags win over the config file
    let file_logging = paths.load_config().ok().map(|c| c.logging).unwrap_or_default();
    let level = cli.log_level.unwrap_or(file_logging.level);
    let json = cli.json_logs || file_logging.format == "json";
    logging::init(&level, json)?;

    let account = cli.account.as_deref();

    match cli.command {
        Commands::Init(cmd) => cmd.execute(&paths, account),
        Commands::Stake(cmd) => cmd.execute(&Node::open(&paths)?, account),
        Commands::Withdraw(cmd) => cmd.execute(&Node::open(&paths)?, account),
        Commands::Claim(cmd) => cmd.execute(&Node::open(&paths)?, account),
        Commands::Status(cmd) => cmd.execute(&Node::open(&paths)?, account),
        Commands::DecryptStake(cmd) => {
            cmd.execute(DecryptTarget::Stake, &Node::open(&paths)?, account)
        }
        Commands::DecryptReward(cmd) => {
            cmd.execute(DecryptTarget::Reward, &Node::open(&paths)?, account)
        }
        Commands::DecryptBalance(cmd) => {
            cmd.execute(DecryptTarget::Balance, &Node::open(&paths)?, account)
        }
        Commands::Version => {
            println!("zstake {}", env!("CARGO_PKG_VERSION"));
            println!(
                "Reward rate: {} ZCOIN per staked unit per day",
                zstake_staking::REWARD_PER_UNIT_PER_DAY
            );
            Ok(())
        }
    }
}
