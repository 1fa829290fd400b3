//! FHE Ciphertext types with Real TFHE-rs
//!
//! FHEUint64 is the encrypted amount type for stakes, rewards and token
//! balances. FHECiphertext is its serialized, storable form.

use serde::{Deserialize, Serialize};
use crate::{FHEError, FHEResult};
use super::keys::{ClientKey, PublicKey};
use tfhe::prelude::*;
use tfhe::{CompactFheUint64, FheUint64 as TfheFheUint64};

/// Wrapper around TFHE-rs ciphertext for serialization
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FHECiphertext {
    /// Serialized ciphertext bytes
    data: Vec<u8>,
    /// Number of bits encrypted
    bits: u8,
    /// Operation count (for noise tracking)
    op_count: u32,
}

impl FHECiphertext {
    /// Get the ciphertext data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the number of bits
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Operations applied since the value was freshly encrypted
    pub fn op_count(&self) -> u32 {
        self.op_count
    }
}

impl std::fmt::Debug for FHECiphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FHECiphertext")
            .field("size", &self.data.len())
            .field("bits", &self.bits)
            .field("ops", &self.op_count)
            .finish()
    }
}

/// Encrypted 64-bit unsigned integer
#[derive(Clone)]
pub struct FHEUint64 {
    /// Inner TFHE-rs encrypted value
    inner: TfheFheUint64,
    /// Operation count for noise tracking
    op_count: u32,
}

impl FHEUint64 {
    /// Encrypt with the compact public key
    pub fn encrypt_with_public(value: u64, public_key: &PublicKey) -> FHEResult<Self> {
        let compact = CompactFheUint64::try_encrypt(value, public_key.inner())
            .map_err(|e| FHEError::EncryptionFailed(e.to_string()))?;

        Ok(Self {
            inner: compact.expand(),
            op_count: 0,
        })
    }

    /// Decrypt to u64 using client key
    pub fn decrypt(&self, client_key: &ClientKey) -> u64 {
        self.inner.decrypt(client_key.inner())
    }

    /// Get reference to inner TFHE value
    pub fn inner(&self) -> &TfheFheUint64 {
        &self.inner
    }

    /// Create from TFHE FheUint64 with operation count
    pub fn from_tfhe_with_ops(inner: TfheFheUint64, op_count: u32) -> Self {
        Self { inner, op_count }
    }

    /// Get operation count
    pub fn op_count(&self) -> u32 {
        self.op_count
    }

    /// Serialize to FHECiphertext for storage/transmission
    pub fn to_ciphertext(&self) -> FHEResult<FHECiphertext> {
        let data = bincode::serialize(&self.inner)?;

        Ok(FHECiphertext {
            data,
            bits: 64,
            op_count: self.op_count,
        })
    }

    /// Deserialize from FHECiphertext
    pub fn from_ciphertext(ct: &FHECiphertext) -> FHEResult<Self> {
        if ct.bits != 64 {
            return Err(FHEError::SerializationError(format!(
                "expected 64-bit ciphertext, got {} bits",
                ct.bits
            )));
        }
        let inner: TfheFheUint64 = bincode::deserialize(&ct.data)?;

        Ok(Self {
            inner,
            op_count: ct.op_count,
        })
    }
}

impl std::fmt::Debug for FHEUint64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FHEUint64")
            .field("value", &"<encrypted>")
            .field("ops", &self.op_count)
            .finish()
    }
}
