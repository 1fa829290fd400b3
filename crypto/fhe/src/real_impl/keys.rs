//! FHE Key Management with Real TFHE-rs
//!
//! - ClientKey: For decryption (held by the decryption service)
//! - ServerKey: For homomorphic operations (held by the staking engine)
//! - PublicKey: Compact public key for encryption (held by the engine)
//!
//! All three carry the hash of the [`FHEConfig`] they were generated under so
//! a node never mixes keys from different parameter sets.

use crate::{FHEConfig, FHEError, FHEResult};
use tfhe::shortint::parameters::{
    PARAM_MESSAGE_2_CARRY_2_COMPACT_PK_KS_PBS, PARAM_MESSAGE_2_CARRY_2_COMPACT_PK_PBS_KS,
};
use tfhe::{generate_keys, CompactPublicKey, ConfigBuilder};
use tfhe::{ClientKey as TfheClientKey, ServerKey as TfheServerKey};

/// TFHE parameters compatible with compact public-key encryption
fn tfhe_config(config: &FHEConfig) -> FHEResult<tfhe::Config> {
    if config.security_bits < 128 {
        return Err(FHEError::InvalidKey(format!(
            "unsupported security level: {} bits",
            config.security_bits
        )));
    }

    let params = if config.small_encryption {
        PARAM_MESSAGE_2_CARRY_2_COMPACT_PK_PBS_KS
    } else {
        PARAM_MESSAGE_2_CARRY_2_COMPACT_PK_KS_PBS
    };

    Ok(ConfigBuilder::default()
        .use_custom_parameters(params, None)
        .build())
}

/// Client key for decryption
/// Never leaves the decryption service
#[derive(Clone)]
pub struct ClientKey {
    pub(crate) inner: TfheClientKey,
    config_hash: [u8; 32],
}

impl ClientKey {
    /// Get reference to inner TFHE key
    pub fn inner(&self) -> &TfheClientKey {
        &self.inner
    }

    /// Hash of the configuration this key was generated under
    pub fn config_hash(&self) -> [u8; 32] {
        self.config_hash
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> FHEResult<Vec<u8>> {
        Ok(bincode::serialize(&(&self.config_hash, &self.inner))?)
    }

    /// Deserialize from bytes, rejecting keys from another configuration
    pub fn from_bytes(bytes: &[u8], config: &FHEConfig) -> FHEResult<Self> {
        let (config_hash, inner): ([u8; 32], TfheClientKey) = bincode::deserialize(bytes)?;
        check_config(&config_hash, config)?;
        Ok(Self { inner, config_hash })
    }
}

impl std::fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientKey")
            .field("config_hash", &hex::encode(&self.config_hash[..8]))
            .finish()
    }
}

/// Server key for homomorphic operations
#[derive(Clone)]
pub struct ServerKey {
    pub(crate) inner: TfheServerKey,
    config_hash: [u8; 32],
}

impl ServerKey {
    /// Verify this key matches the expected configuration
    pub fn verify_config(&self, config: &FHEConfig) -> bool {
        config.config_hash() == self.config_hash
    }

    /// Install this key for the calling thread.
    ///
    /// TFHE-rs keeps the server key in thread-local storage, so every thread
    /// that evaluates ciphertext operators must install it first. The inner
    /// key is reference counted, the clone is cheap.
    pub fn install(&self) {
        tfhe::set_server_key(self.inner.clone());
    }

    /// Serialize to bytes (WARNING: ServerKey is large, ~100MB+)
    pub fn to_bytes(&self) -> FHEResult<Vec<u8>> {
        Ok(bincode::serialize(&(&self.config_hash, &self.inner))?)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8], config: &FHEConfig) -> FHEResult<Self> {
        let (config_hash, inner): ([u8; 32], TfheServerKey) = bincode::deserialize(bytes)?;
        check_config(&config_hash, config)?;
        Ok(Self { inner, config_hash })
    }
}

impl std::fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerKey")
            .field("config_hash", &hex::encode(&self.config_hash[..8]))
            .finish()
    }
}

/// Compact public key for encryption only
#[derive(Clone)]
pub struct PublicKey {
    inner: CompactPublicKey,
    config_hash: [u8; 32],
}

impl PublicKey {
    /// Get a compact identifier for this public key
    pub fn id(&self) -> [u8; 32] {
        let serialized = bincode::serialize(&self.inner).unwrap_or_default();
        *blake3::hash(&serialized).as_bytes()
    }

    /// Get reference to inner key
    pub fn inner(&self) -> &CompactPublicKey {
        &self.inner
    }

    /// Check the key was generated under the same configuration as a server key.
    ///
    /// Two key sets generated from one config are not told apart.
    pub fn matches(&self, server: &ServerKey) -> bool {
        self.config_hash == server.config_hash
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> FHEResult<Vec<u8>> {
        Ok(bincode::serialize(&(&self.config_hash, &self.inner))?)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8], config: &FHEConfig) -> FHEResult<Self> {
        let (config_hash, inner): ([u8; 32], CompactPublicKey) = bincode::deserialize(bytes)?;
        check_config(&config_hash, config)?;
        Ok(Self { inner, config_hash })
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey")
            .field("id", &hex::encode(&self.id()[..8]))
            .finish()
    }
}

fn check_config(found: &[u8; 32], config: &FHEConfig) -> FHEResult<()> {
    if *found != config.config_hash() {
        return Err(FHEError::InvalidKey(format!(
            "key generated for config {}, expected {}",
            hex::encode(&found[..8]),
            hex::encode(&config.config_hash()[..8])
        )));
    }
    Ok(())
}

/// Complete key set for one deployment
#[derive(Clone)]
pub struct KeyPair {
    /// Client key (secret)
    pub client: ClientKey,
    /// Server key (engine)
    pub server: ServerKey,
    /// Public key (engine, can be published)
    pub public: PublicKey,
}

impl KeyPair {
    /// Generate a new key set
    ///
    /// WARNING: Key generation is slow (~10-30 seconds)
    pub fn generate(config: &FHEConfig) -> FHEResult<Self> {
        let tfhe_config = tfhe_config(config)?;

        let (client_key, server_key) = generate_keys(tfhe_config);
        let public_key = CompactPublicKey::try_new(&client_key).ok_or_else(|| {
            FHEError::KeyGenerationFailed("parameters do not support compact public keys".into())
        })?;

        let config_hash = config.config_hash();
        tracing::debug!(config = %hex::encode(&config_hash[..8]), "generated FHE key set");

        Ok(Self {
            client: ClientKey {
                inner: client_key,
                config_hash,
            },
            server: ServerKey {
                inner: server_key,
                config_hash,
            },
            public: PublicKey {
                inner: public_key,
                config_hash,
            },
        })
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_id", &hex::encode(&self.public.id()[..8]))
            .finish()
    }
}
