//! Identities, ciphertext handles and encrypted amounts

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zstake_fhe::FHEUint64;

use crate::errors::{StakingError, StakingResult};

fn parse_hex32(s: &str) -> StakingResult<[u8; 32]> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s)
        .map_err(|e| StakingError::InvalidIdentifier(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| StakingError::InvalidIdentifier("expected 32 bytes".into()))
}

fn random32() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Opaque principal supplied by the host as the caller identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub fn from_hex(s: &str) -> StakingResult<Self> {
        parse_hex32(s).map(Self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self)
    }
}

/// Address of a persisted ciphertext.
///
/// `Handle::ZERO` is the canonical encrypted zero every field starts from; it
/// carries no secret and anyone may decrypt it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub [u8; 32]);

impl Handle {
    pub const ZERO: Handle = Handle([0u8; 32]);

    /// Allocate a fresh handle
    pub fn random() -> Self {
        Self(random32())
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn from_hex(s: &str) -> StakingResult<Self> {
        parse_hex32(s).map(Self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(0x{})", hex::encode(&self.0[..8]))
    }
}

/// Identifier of one claim, used to make the token credit idempotent
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub [u8; 32]);

impl ClaimId {
    pub fn random() -> Self {
        Self(random32())
    }
}

impl fmt::Debug for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClaimId(0x{})", hex::encode(&self.0[..8]))
    }
}

/// A ciphertext together with the handle it is (or will be) stored under
#[derive(Clone)]
pub struct EncryptedAmount {
    pub handle: Handle,
    pub value: Arc<FHEUint64>,
}

impl EncryptedAmount {
    pub fn new(handle: Handle, value: FHEUint64) -> Self {
        Self {
            handle,
            value: Arc::new(value),
        }
    }

    /// Wrap a freshly computed ciphertext under a new handle
    pub fn fresh(value: FHEUint64) -> Self {
        Self::new(Handle::random(), value)
    }
}

impl fmt::Debug for EncryptedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedAmount")
            .field("handle", &self.handle)
            .field("ops", &self.value.op_count())
            .finish()
    }
}
