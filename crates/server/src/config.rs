//! Configuration management for the mint server

use anyhow::Result;
use coinforge_core::constants::{
    DEFAULT_CONFIRM_POLL_MS, DEFAULT_CONFIRM_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_PIN_ENDPOINT, DEFAULT_RPC_URL,
};
use coinforge_core::{Commitment, ConfirmOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate]
    pub server: HttpConfig,
    #[validate]
    pub solana: SolanaConfig,
    #[validate]
    pub metadata: MetadataConfig,
    #[validate]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_address: String,
    /// Base used to build absolute links to uploaded files
    #[validate(url)]
    pub public_base_url: String,
    pub upload_dir: PathBuf,
    pub enable_cors: bool,
    pub cors_origin: String,
    #[validate(range(min = 1, max = 100))]
    pub max_request_size_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SolanaConfig {
    #[validate(url)]
    pub rpc_url: String,
    pub commitment: String,
    /// Environment variable holding the base58 payer secret key
    pub secret_key_env: String,
    #[validate(range(min = 1, max = 600))]
    pub confirm_timeout_secs: u64,
    #[validate(range(min = 50, max = 10000))]
    pub confirm_poll_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MetadataConfig {
    #[validate(url)]
    pub pin_endpoint: String,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            public_base_url: "http://localhost:3001".to_string(),
            upload_dir: "uploads".into(),
            enable_cors: true,
            cors_origin: "http://localhost:3000".to_string(),
            max_request_size_mb: 10,
        }
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: "confirmed".to_string(),
            secret_key_env: "SECRET_KEY".to_string(),
            confirm_timeout_secs: DEFAULT_CONFIRM_TIMEOUT_SECS,
            confirm_poll_ms: DEFAULT_CONFIRM_POLL_MS,
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            pin_endpoint: DEFAULT_PIN_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl SolanaConfig {
    pub fn commitment(&self) -> Result<Commitment> {
        Ok(Commitment::from_str(&self.commitment)?)
    }

    pub fn confirm_options(&self) -> Result<ConfirmOptions> {
        Ok(ConfirmOptions {
            commitment: self.commitment()?,
            timeout: Duration::from_secs(self.confirm_timeout_secs),
            poll_interval: Duration::from_millis(self.confirm_poll_ms),
        })
    }
}

impl MetadataConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ServerConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Ensure the upload directory exists
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.server.upload_dir)?;
        Ok(())
    }

    /// Field ranges plus the cross-field rules derive can't express
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self)?;

        if self.server.bind_address.is_empty() {
            return Err(anyhow::anyhow!("Bind address cannot be empty"));
        }
        if self.solana.secret_key_env.is_empty() {
            return Err(anyhow::anyhow!("Secret key variable name cannot be empty"));
        }
        if self.server.enable_cors && self.server.cors_origin.is_empty() {
            return Err(anyhow::anyhow!("CORS origin is required when CORS is enabled"));
        }
        self.solana.commitment()?;
        Ok(())
    }
}
