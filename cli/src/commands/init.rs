//! Init Command - Initialize a new node

use std::fs;

use clap::Args;
use tracing::info;
use zstake_fhe::KeyPair;
use zstake_storage::RedbBackend;

use crate::config::ZstakeConfig;
use crate::node::{write_keys, NodePaths};

/// Initialize a new node
#[derive(Args)]
pub struct InitCommand {
    /// Use the smaller-ciphertext parameter set
    #[arg(long)]
    small_encryption: bool,

    /// Force overwrite existing configuration and keys
    #[arg(short, long)]
    pub(crate) force: bool,
}

impl InitCommand {
    /// `account`, from the global flag, becomes the configured default caller
    pub fn execute(self, paths: &NodePaths, account: Option<&str>) -> anyhow::Result<()> {
        info!("Initializing zstake node");
        info!("Data directory: {}", paths.data_dir.display());

        // Check if already initialized
        if paths.config.exists() && !self.force {
            anyhow::bail!(
                "Node already initialized at {}. Use --force to overwrite.",
                paths.data_dir.display()
            );
        }

        let mut config = ZstakeConfig::default();
        config.fhe.small_encryption = self.small_encryption;
        if let Some(account) = account {
            zstake_staking::AccountId::from_hex(account)?;
            config.node.account = Some(account.to_string());
        }

        fs::create_dir_all(&paths.data_dir)?;

        // Existing ciphertexts are unusable under new keys
        let db_path = paths.resolve(&config.storage.db_file);
        if db_path.exists() {
            fs::remove_file(&db_path)?;
            info!("Removed previous database {}", db_path.display());
        }

        println!("Generating FHE keys (this can take a while)...");
        let keys = KeyPair::generate(&config.fhe_config())?;
        write_keys(paths, &config, &keys)?;

        let store = RedbBackend::open(&db_path)?;
        store.bind_key(&keys.public.id())?;

        config.save(&paths.config)?;
        info!("Configuration saved to {}", paths.config.display());

        println!();
        println!("zstake node initialized");
        println!();
        println!("Configuration:  {}", paths.config.display());
        println!("Data directory: {}", paths.data_dir.display());
        println!("Public key:     {}", hex::encode(keys.public.id()));
        println!();
        println!("To stake:");
        println!("  zstake --data-dir {} stake --amount 1", paths.data_dir.display());

        Ok(())
    }
}
