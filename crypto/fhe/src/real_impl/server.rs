//! FHE Server for engine-side computation
//!
//! The staking engine holds the server key and the compact public key. It can
//! encrypt fresh amounts and evaluate arithmetic on ciphertexts, but it never
//! holds a client key and therefore can never decrypt.

use crate::{FHEError, FHEResult, SECONDS_PER_DAY};
use super::ciphertext::FHEUint64;
use super::keys::{PublicKey, ServerKey};
use super::operations::{FHEBool, FHEOps};

/// Plaintext split of `rate * elapsed` around [`SECONDS_PER_DAY`].
///
/// `rate * elapsed == whole * SECONDS_PER_DAY + remainder`, so for any stake
/// `s`: `s * rate * elapsed / SECONDS_PER_DAY == s * whole + (s * remainder) / SECONDS_PER_DAY`
/// with truncating division on both sides. Evaluating the right-hand side
/// keeps every encrypted intermediate below the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedFactor {
    pub whole: u64,
    pub remainder: u64,
}

impl ElapsedFactor {
    /// Split `rate_per_day * elapsed_secs`; fails if the whole part exceeds 64 bits
    pub fn split(rate_per_day: u64, elapsed_secs: u64) -> FHEResult<Self> {
        let product = rate_per_day as u128 * elapsed_secs as u128;
        let day = SECONDS_PER_DAY as u128;
        let whole = u64::try_from(product / day).map_err(|_| FHEError::Overflow)?;

        Ok(Self {
            whole,
            remainder: (product % day) as u64,
        })
    }

    /// Same formula on a plaintext stake, for callers that know it
    pub fn apply_plain(&self, stake: u64) -> Option<u64> {
        let whole = (stake as u128).checked_mul(self.whole as u128)?;
        let fraction = stake as u128 * self.remainder as u128 / SECONDS_PER_DAY as u128;
        u64::try_from(whole + fraction).ok()
    }

    /// True when no reward can result regardless of stake
    pub fn is_zero(&self) -> bool {
        self.whole == 0 && self.remainder == 0
    }
}

/// Engine-side FHE context
#[derive(Clone)]
pub struct FHEServer {
    server_key: ServerKey,
    public_key: PublicKey,
}

impl FHEServer {
    /// Create a server context from a matching key set
    pub fn new(server_key: ServerKey, public_key: PublicKey) -> FHEResult<Self> {
        if !public_key.matches(&server_key) {
            return Err(FHEError::InvalidKey(
                "public key and server key come from different configurations".into(),
            ));
        }
        server_key.install();
        Ok(Self {
            server_key,
            public_key,
        })
    }

    /// Get reference to server key
    pub fn server_key(&self) -> &ServerKey {
        &self.server_key
    }

    /// Install the server key on the calling thread
    pub fn install(&self) {
        self.server_key.install();
    }

    /// Encrypt a plaintext amount with the public key
    pub fn encrypt_amount(&self, value: u64) -> FHEResult<FHEUint64> {
        FHEUint64::encrypt_with_public(value, &self.public_key)
    }

    /// Fresh encryption of zero
    pub fn zero(&self) -> FHEResult<FHEUint64> {
        self.encrypt_amount(0)
    }

    /// Add two encrypted values
    pub fn add(&self, a: &FHEUint64, b: &FHEUint64) -> FHEUint64 {
        FHEOps::add(a, b)
    }

    /// Subtract `b` from `a`; the caller guarantees `a >= b`
    pub fn sub(&self, a: &FHEUint64, b: &FHEUint64) -> FHEUint64 {
        FHEOps::sub(a, b)
    }

    /// Select between two values based on an encrypted condition
    pub fn select(&self, cond: &FHEBool, if_true: &FHEUint64, if_false: &FHEUint64) -> FHEUint64 {
        FHEOps::select(cond, if_true, if_false)
    }

    /// `stake * rate_per_day * elapsed_secs / SECONDS_PER_DAY`, truncating.
    ///
    /// Only plaintext scalars touch the ciphertext; elapsed time is public.
    pub fn scale_by_elapsed_time(
        &self,
        stake: &FHEUint64,
        elapsed_secs: u64,
        rate_per_day: u64,
    ) -> FHEResult<FHEUint64> {
        let factor = ElapsedFactor::split(rate_per_day, elapsed_secs)?;
        if factor.is_zero() {
            return self.zero();
        }

        let whole = FHEOps::mul_scalar(stake, factor.whole);
        if factor.remainder == 0 {
            return Ok(whole);
        }

        let partial = FHEOps::mul_scalar(stake, factor.remainder);
        let fraction = FHEOps::div_scalar(&partial, SECONDS_PER_DAY)?;
        Ok(FHEOps::add(&whole, &fraction))
    }
}

impl std::fmt::Debug for FHEServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FHEServer")
            .field("server_key", &self.server_key)
            .field("public_key", &self.public_key)
            .finish()
    }
}
