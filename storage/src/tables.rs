//! Table layout and value encoding

use redb::TableDefinition;
use serde::{Deserialize, Serialize};
use zstake_fhe::{FHECiphertext, FHEUint64};
use zstake_staking::{Acl, EncryptedAmount, Handle};

use crate::{StorageError, StorageResult};

/// Account id -> bincode `AccountRecord`
pub(crate) const ACCOUNTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("accounts");

/// Handle -> bincode `StoredCiphertext`
pub(crate) const CIPHERTEXTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("ciphertexts");

/// Holder id -> balance handle
pub(crate) const BALANCES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("token_balances");

/// Claim id -> credited holder id
pub(crate) const CREDITED: TableDefinition<&[u8], &[u8]> = TableDefinition::new("credited_claims");

/// Claim id -> bincode `PendingClaim`
pub(crate) const CLAIMS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("claim_journal");

/// Sequence number -> bincode `EventRecord`
pub(crate) const EVENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("events");

pub(crate) const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

/// Ciphertext row
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StoredCiphertext {
    pub ciphertext: FHECiphertext,
    pub acl: Acl,
}

pub(crate) fn encode_ciphertext(amount: &EncryptedAmount, acl: &Acl) -> StorageResult<Vec<u8>> {
    let stored = StoredCiphertext {
        ciphertext: amount.value.to_ciphertext()?,
        acl: acl.clone(),
    };
    Ok(bincode::serialize(&stored)?)
}

pub(crate) fn decode_ciphertext(stored: &StoredCiphertext) -> StorageResult<FHEUint64> {
    Ok(FHEUint64::from_ciphertext(&stored.ciphertext)?)
}

pub(crate) fn handle_from_bytes(bytes: &[u8]) -> StorageResult<Handle> {
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| StorageError::InvalidData("Invalid handle bytes".into()))?;
    Ok(Handle(arr))
}
