//! Configuration management for chainsign
//!
//! Supports loading configuration from:
//! - Environment variables (CHAINSIGN_*)
//! - Config file (config.toml)
//! - Built-in defaults

use crate::errors::{ChainSignError, Result};
use serde::{Deserialize, Serialize};

/// Help text shown to operators mounting the backend
const DEFAULT_DESCRIPTION: &str = "Manages secp256k1 keys for Cosmos- and Ethereum-compatible \
     chains. Keys are generated or imported by name, cached in memory over the host's storage, \
     and never leave the backend unless marked exportable at creation.";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Operator-facing description of the backend
    pub description: String,

    /// Security configuration
    pub security: SecurityConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            security: SecurityConfig::default(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Disable core dumps during setup
    pub disable_core_dumps: bool,

    /// Check that memory locking is available during setup
    pub verify_mlock: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            disable_core_dumps: true,
            verify_mlock: true,
        }
    }
}

impl BackendConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Start with defaults
        builder = builder.add_source(
            config::Config::try_from(&BackendConfig::default())
                .map_err(|e| ChainSignError::Config(e.to_string()))?,
        );

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        } else {
            // Try default locations
            builder = builder
                .add_source(config::File::with_name("chainsign").required(false))
                .add_source(config::File::with_name("/etc/chainsign/config").required(false));
        }

        // Load from environment (CHAINSIGN_SECURITY__VERIFY_MLOCK, etc.)
        builder = builder.add_source(
            config::Environment::with_prefix("CHAINSIGN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ChainSignError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ChainSignError::Config(e.to_string()))
    }
}
