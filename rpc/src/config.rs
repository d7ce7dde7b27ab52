use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default node RPC endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:7077";
/// Path the node serves JSON-RPC on, appended to the endpoint.
pub const DEFAULT_RPC_PATH: &str = "/rpc";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("endpoint must not be empty")]
    EmptyEndpoint,

    #[error("endpoint must use http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("rpc path must start with '/', got {0:?}")]
    InvalidRpcPath(String),

    #[error("timeout must be > 0")]
    ZeroTimeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Connection settings for a Phantasma node.
///
/// Loaded from a TOML file; every key is optional and falls back to its
/// default:
///
/// ```toml
/// endpoint = "http://localhost:7077"
/// rpc_path = "/rpc"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the node, scheme included.
    pub endpoint: String,
    /// Path of the JSON-RPC handler. Empty posts to the endpoint itself.
    pub rpc_path: String,
    /// Per-request timeout enforced by the HTTP transport.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            rpc_path: DEFAULT_RPC_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at `endpoint`.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Load a config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(self.endpoint.clone()));
        }
        if !self.rpc_path.is_empty() && !self.rpc_path.starts_with('/') {
            return Err(ConfigError::InvalidRpcPath(self.rpc_path.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Full URL requests are posted to.
    pub fn rpc_url(&self) -> String {
        format!("{}{}", self.endpoint.trim().trim_end_matches('/'), self.rpc_path)
    }
}
