//! zstake FHE Operations
//!
//! Homomorphic arithmetic on encrypted 64-bit amounts using TFHE-rs.
//! The staking engine only ever touches values through this crate, so no
//! plaintext stake or reward is observable outside the key holder.
//!
//! # Key Features:
//! - Public-key encryption of plaintext amounts (no client key on the server)
//! - Homomorphic addition and subtraction
//! - Multiplication and truncating division by plaintext scalars
//! - Time-proportional scaling (`stake * rate * elapsed / 86400`)
//! - Comparison-free conditional selection
//!
//! # Architecture:
//! - ClientKey: For decryption (held by the decryption service only)
//! - ServerKey: For homomorphic operations (held by the engine)
//! - PublicKey: For encryption (held by the engine, can be published)

pub mod errors;
mod real_impl;

pub use real_impl::*;
pub use errors::FHEError;

/// Seconds in one accrual day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// FHE Configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FHEConfig {
    /// Security parameter (bits)
    pub security_bits: u32,
    /// Use the PBS-then-keyswitch parameter family (smaller ciphertexts, slower ops)
    pub small_encryption: bool,
}

impl Default for FHEConfig {
    fn default() -> Self {
        Self {
            security_bits: 128,
            small_encryption: false,
        }
    }
}

impl FHEConfig {
    /// Stable identifier of this configuration, embedded in every key
    pub fn config_hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"zstake.fhe.config.v1");
        hasher.update(&self.security_bits.to_le_bytes());
        hasher.update(&[self.small_encryption as u8]);
        *hasher.finalize().as_bytes()
    }
}

/// Result type for FHE operations
pub type FHEResult<T> = Result<T, FHEError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = FHEConfig::default();
        assert_eq!(config.security_bits, 128);
        assert!(!config.small_encryption);
    }

    #[test]
    fn test_config_hash_distinguishes_parameter_sets() {
        let default = FHEConfig::default();
        let small = FHEConfig {
            small_encryption: true,
            ..FHEConfig::default()
        };
        assert_eq!(default.config_hash(), FHEConfig::default().config_hash());
        assert_ne!(default.config_hash(), small.config_hash());
    }
}
