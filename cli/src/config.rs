//! Node Configuration
//!
//! Handles loading and saving node configuration from TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zstake_fhe::FHEConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZstakeConfig {
    /// General node settings
    #[serde(default)]
    pub node: NodeSettings,

    /// FHE parameter settings
    #[serde(default)]
    pub fhe: FheSettings,

    /// Key file locations
    #[serde(default)]
    pub keys: KeySettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ZstakeConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// FHE configuration the keys were generated with
    pub fn fhe_config(&self) -> FHEConfig {
        FHEConfig {
            security_bits: self.fhe.security_bits,
            small_encryption: self.fhe.small_encryption,
        }
    }

    /// Resolve a path from the config relative to the data directory
    pub fn resolve(data_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            data_dir.join(path)
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fhe.security_bits < 128 {
            return Err(ConfigError::Invalid(
                "FHE security level must be at least 128 bits".to_string(),
            ));
        }

        if self.storage.db_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Database file must be set".to_string(),
            ));
        }

        if let Some(account) = &self.node.account {
            zstake_staking::AccountId::from_hex(account)
                .map_err(|e| ConfigError::Invalid(format!("node.account: {}", e)))?;
        }

        Ok(())
    }
}

/// General node settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Default caller identity (hex, 32 bytes)
    pub account: Option<String>,
}

/// FHE parameter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FheSettings {
    /// Target security level in bits
    pub security_bits: u32,

    /// Smaller ciphertexts at the cost of slower evaluation
    pub small_encryption: bool,
}

impl Default for FheSettings {
    fn default() -> Self {
        let config = FHEConfig::default();
        Self {
            security_bits: config.security_bits,
            small_encryption: config.small_encryption,
        }
    }
}

/// Key file locations, relative to the data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySettings {
    pub client_key: PathBuf,
    pub server_key: PathBuf,
    pub public_key: PathBuf,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            client_key: PathBuf::from("keystore/client.key"),
            server_key: PathBuf::from("keystore/server.key"),
            public_key: PathBuf::from("keystore/public.key"),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file, relative to the data directory
    pub db_file: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_file: PathBuf::from("state/zstake.redb"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,

    /// Output format (text, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "zstake", "zstake")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".zstake"))
}

/// Get default config file path
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ZstakeConfig::default();
        assert_eq!(config.fhe.security_bits, 128);
        assert_eq!(config.logging.level, "info");
        assert!(config.node.account.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ZstakeConfig::default();
        config.node.account = Some(hex::encode([7u8; 32]));
        config.save(&path).unwrap();

        let loaded = ZstakeConfig::load(&path).unwrap();
        assert_eq!(loaded.node.account, config.node.account);
        assert_eq!(loaded.storage.db_file, PathBuf::from("state/zstake.redb"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\nformat = \"json\"\n").unwrap();

        let loaded = ZstakeConfig::load(&path).unwrap();
        assert_eq!(loaded.logging.format, "json");
        assert_eq!(loaded.fhe.security_bits, 128);
    }

    #[test]
    fn test_invalid_security_level() {
        let config = ZstakeConfig {
            fhe: FheSettings {
                security_bits: 64,
                small_encryption: false,
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_account() {
        let mut config = ZstakeConfig::default();
        config.node.account = Some("not-hex".into());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_resolve_relative_paths() {
        let base = Path::new("/data");
        assert_eq!(
            ZstakeConfig::resolve(base, Path::new("state/x.redb")),
            PathBuf::from("/data/state/x.redb")
        );
        assert_eq!(
            ZstakeConfig::resolve(base, Path::new("/abs/x.redb")),
            PathBuf::from("/abs/x.redb")
        );
    }
}
