//! Node context shared by the commands
//!
//! Loads the configuration and keys from the data directory, opens the
//! database and assembles the engine, the token and the local decryption
//! service.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use zstake_fhe::{ClientKey, FHEServer, KeyPair, PublicKey, ServerKey};
use zstake_staking::{AccountId, DecryptionService, StakingEngine, SystemClock, Zcoin};
use zstake_storage::RedbBackend;

use crate::config::{default_config_path, default_data_dir, ZstakeConfig};

pub type Engine = StakingEngine<RedbBackend, Zcoin<RedbBackend>, SystemClock>;

/// Where the node lives on disk
#[derive(Debug, Clone)]
pub struct NodePaths {
    pub data_dir: PathBuf,
    pub config: PathBuf,
}

impl NodePaths {
    pub fn new(config: Option<PathBuf>, data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let config = config.unwrap_or_else(|| default_config_path(&data_dir));
        Self { data_dir, config }
    }

    pub fn load_config(&self) -> anyhow::Result<ZstakeConfig> {
        ZstakeConfig::load(&self.config).with_context(|| {
            format!(
                "loading {} (run `zstake init` first)",
                self.config.display()
            )
        })
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        ZstakeConfig::resolve(&self.data_dir, path)
    }
}

/// Write a freshly generated key set to the configured locations
pub fn write_keys(paths: &NodePaths, config: &ZstakeConfig, keys: &KeyPair) -> anyhow::Result<()> {
    let files = [
        (&config.keys.client_key, keys.client.to_bytes()?),
        (&config.keys.server_key, keys.server.to_bytes()?),
        (&config.keys.public_key, keys.public.to_bytes()?),
    ];

    for (path, bytes) in files {
        let path = paths.resolve(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Everything a command needs
pub struct Node {
    pub config: ZstakeConfig,
    pub engine: Engine,
    pub store: Arc<RedbBackend>,
    pub decryption: DecryptionService<RedbBackend>,
}

impl Node {
    pub fn open(paths: &NodePaths) -> anyhow::Result<Self> {
        let config = paths.load_config()?;
        let fhe_config = config.fhe_config();

        let server_key = ServerKey::from_bytes(&read(&paths.resolve(&config.keys.server_key))?, &fhe_config)?;
        let public_key = PublicKey::from_bytes(&read(&paths.resolve(&config.keys.public_key))?, &fhe_config)?;
        let client_key = ClientKey::from_bytes(&read(&paths.resolve(&config.keys.client_key))?, &fhe_config)?;

        let store = Arc::new(RedbBackend::open(paths.resolve(&config.storage.db_file))?);
        store.bind_key(&public_key.id())?;

        let fhe = FHEServer::new(server_key, public_key)?;
        let token = Arc::new(Zcoin::new(store.clone(), fhe.clone()));
        let engine = StakingEngine::new(store.clone(), token, fhe, SystemClock)?;

        let recovered = engine.recover_pending_claims()?;
        if recovered > 0 {
            warn!(recovered, "finished claims interrupted by a previous run");
        }

        info!(data_dir = %paths.data_dir.display(), "node ready");
        Ok(Self {
            decryption: DecryptionService::new(client_key, store.clone()),
            config,
            engine,
            store,
        })
    }

    /// Caller identity: the `--account` flag, else the configured default
    pub fn account(&self, flag: Option<&str>) -> anyhow::Result<AccountId> {
        self.optional_account(flag)?
            .context("no account given; pass --account or set node.account")
    }

    /// Like [`Node::account`], but `None` when no account is given at all
    pub fn optional_account(&self, flag: Option<&str>) -> anyhow::Result<Option<AccountId>> {
        caller_account(flag, self.config.node.account.as_deref())
    }
}

fn caller_account(flag: Option<&str>, configured: Option<&str>) -> anyhow::Result<Option<AccountId>> {
    let Some(hex) = flag.or(configured) else {
        return Ok(None);
    };
    let account = AccountId::from_hex(hex).context("invalid account")?;
    Ok(Some(account))
}
