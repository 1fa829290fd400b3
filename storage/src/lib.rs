//! zstake Storage Layer
//!
//! Persistent backend for the staking engine and the reward token.
//!
//! # Architecture
//!
//! One redb database holds:
//! - Account records (plaintext mirror, timestamps, ciphertext handles)
//! - Ciphertexts with their decryption ACLs
//! - Token balances and the set of credited claim ids
//! - The claim journal
//! - The append-only event log
//! - Metadata (format version, bound FHE key set)
//!
//! Every engine commit is a single redb write transaction.

mod error;
mod state;
mod tables;
mod token;

pub use error::{StorageError, StorageResult};

use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable};
use tracing::{debug, info};
use zstake_fhe::FHEUint64;
use zstake_staking::{Acl, CiphertextSource, EncryptedAmount, Handle, StakingResult};

use tables::{
    decode_ciphertext, StoredCiphertext, ACCOUNTS, BALANCES, CIPHERTEXTS, CLAIMS, CREDITED,
    EVENTS, META,
};

/// On-disk layout version
pub const FORMAT_VERSION: u32 = 1;

const META_FORMAT: &str = "format";
const META_KEY_ID: &str = "key_id";

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Database path
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./zstake_data/zstake.redb"),
        }
    }
}

/// redb-backed [`zstake_staking::StateBackend`] and [`zstake_staking::TokenBackend`]
pub struct RedbBackend {
    db: Database,
    config: StorageConfig,
}

impl RedbBackend {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(StorageConfig {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Open storage with custom configuration
    pub fn with_config(config: StorageConfig) -> StorageResult<Self> {
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&config.path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(CIPHERTEXTS)?;
            let _ = write_txn.open_table(BALANCES)?;
            let _ = write_txn.open_table(CREDITED)?;
            let _ = write_txn.open_table(CLAIMS)?;
            let _ = write_txn.open_table(EVENTS)?;

            let mut meta = write_txn.open_table(META)?;
            let found = match meta.get(META_FORMAT)? {
                Some(data) => Some(read_u32(data.value())?),
                None => None,
            };
            match found {
                Some(found) if found != FORMAT_VERSION => {
                    return Err(StorageError::Format {
                        found,
                        expected: FORMAT_VERSION,
                    });
                }
                Some(_) => {}
                None => {
                    meta.insert(META_FORMAT, &FORMAT_VERSION.to_le_bytes()[..])?;
                }
            }
        }
        write_txn.commit()?;

        info!(path = %config.path.display(), "opened storage");
        Ok(Self { db, config })
    }

    /// Get storage configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Tie the database to one FHE key set.
    ///
    /// The first call records `key_id`; later calls fail unless it matches,
    /// since ciphertexts under another key are unusable.
    pub fn bind_key(&self, key_id: &[u8; 32]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut meta = write_txn.open_table(META)?;
            let stored = meta.get(META_KEY_ID)?.map(|data| data.value().to_vec());
            match stored {
                Some(stored) if stored.as_slice() != key_id.as_slice() => {
                    return Err(StorageError::KeyMismatch {
                        stored: hex::encode(&stored),
                        given: hex::encode(key_id),
                    });
                }
                Some(_) => {}
                None => {
                    meta.insert(META_KEY_ID, key_id.as_slice())?;
                    debug!(key = %hex::encode(&key_id[..8]), "bound storage to key set");
                }
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let stats = StorageStats {
            path: self.config.path.clone(),
            accounts: read_txn.open_table(ACCOUNTS)?.len()?,
            ciphertexts: read_txn.open_table(CIPHERTEXTS)?.len()?,
            events: read_txn.open_table(EVENTS)?.len()?,
            pending_claims: read_txn.open_table(CLAIMS)?.len()?,
        };
        Ok(stats)
    }

    fn read_ciphertext(&self, handle: &Handle) -> StorageResult<Option<StoredCiphertext>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CIPHERTEXTS)?;

        let result = match table.get(handle.0.as_slice())? {
            Some(data) => Some(bincode::deserialize(data.value())?),
            None => None,
        };

        Ok(result)
    }
}

impl CiphertextSource for RedbBackend {
    fn ciphertext(&self, handle: &Handle) -> StakingResult<Option<EncryptedAmount>> {
        let Some(stored) = self.read_ciphertext(handle)? else {
            return Ok(None);
        };
        let value: FHEUint64 = decode_ciphertext(&stored)?;
        Ok(Some(EncryptedAmount::new(*handle, value)))
    }

    fn acl(&self, handle: &Handle) -> StakingResult<Option<Acl>> {
        Ok(self.read_ciphertext(handle)?.map(|stored| stored.acl))
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub path: PathBuf,
    pub accounts: u64,
    pub ciphertexts: u64,
    pub events: u64,
    pub pending_claims: u64,
}

fn read_u32(bytes: &[u8]) -> StorageResult<u32> {
    let arr: [u8; 4] = bytes
        .try_into()
        .map_err(|_| StorageError::InvalidData("Invalid u32 bytes".into()))?;
    Ok(u32::from_le_bytes(arr))
}
