//! FHE Homomorphic Operations with Real TFHE-rs
//!
//! Operations on encrypted values without decryption. The server key must be
//! installed on the calling thread (see [`ServerKey::install`]).
//!
//! [`ServerKey::install`]: super::keys::ServerKey::install

use crate::{FHEError, FHEResult};
use super::ciphertext::FHEUint64;
use tfhe::prelude::*;
use tfhe::FheBool as TfheFheBool;

/// Encrypted boolean for comparison results
#[derive(Clone)]
pub struct FHEBool {
    inner: TfheFheBool,
}

impl FHEBool {
    /// Create from TFHE FheBool
    pub fn from_tfhe(inner: TfheFheBool) -> Self {
        Self { inner }
    }

    /// Get reference to inner value
    pub fn inner(&self) -> &TfheFheBool {
        &self.inner
    }

    /// Decrypt to bool
    pub fn decrypt(&self, client_key: &super::keys::ClientKey) -> bool {
        self.inner.decrypt(client_key.inner())
    }
}

impl std::fmt::Debug for FHEBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FHEBool").finish()
    }
}

/// Stateless homomorphic operators
pub struct FHEOps;

impl FHEOps {
    /// Homomorphic addition of two encrypted u64 values (wrapping)
    pub fn add(a: &FHEUint64, b: &FHEUint64) -> FHEUint64 {
        let result = a.inner() + b.inner();
        FHEUint64::from_tfhe_with_ops(result, a.op_count() + b.op_count() + 1)
    }

    /// Homomorphic subtraction of two encrypted u64 values (wrapping)
    ///
    /// Callers must establish `a >= b` from plaintext knowledge beforehand.
    pub fn sub(a: &FHEUint64, b: &FHEUint64) -> FHEUint64 {
        let result = a.inner() - b.inner();
        FHEUint64::from_tfhe_with_ops(result, a.op_count() + b.op_count() + 1)
    }

    /// Multiply encrypted value by plaintext scalar (wrapping)
    pub fn mul_scalar(a: &FHEUint64, scalar: u64) -> FHEUint64 {
        let result = a.inner() * scalar;
        FHEUint64::from_tfhe_with_ops(result, a.op_count() + 2)
    }

    /// Truncating division of an encrypted value by a plaintext scalar
    pub fn div_scalar(a: &FHEUint64, scalar: u64) -> FHEResult<FHEUint64> {
        if scalar == 0 {
            return Err(FHEError::InvalidScalar("division by zero".into()));
        }
        let result = a.inner() / scalar;
        Ok(FHEUint64::from_tfhe_with_ops(result, a.op_count() + 5))
    }

    /// Homomorphic equality comparison
    pub fn eq(a: &FHEUint64, b: &FHEUint64) -> FHEBool {
        FHEBool::from_tfhe(a.inner().eq(b.inner()))
    }

    /// Homomorphic greater-than-or-equal comparison
    pub fn ge(a: &FHEUint64, b: &FHEUint64) -> FHEBool {
        FHEBool::from_tfhe(a.inner().ge(b.inner()))
    }

    /// Conditional select: if cond then a else b, without revealing cond
    pub fn select(cond: &FHEBool, a: &FHEUint64, b: &FHEUint64) -> FHEUint64 {
        let result = cond.inner().if_then_else(a.inner(), b.inner());
        FHEUint64::from_tfhe_with_ops(result, a.op_count().max(b.op_count()) + 5)
    }
}
