//! Launch configuration
//!
//! The fee recipient has no default; every deployment names its own. The
//! trading API key may come from the file or from `COINFORGE_TRADE_API_KEY`,
//! which wins when both are set.

use crate::payment::FeeTerms;
use crate::trade::TradeParams;
use anyhow::{Context, Result};
use coinforge_core::constants::{
    DEFAULT_CONFIRM_POLL_MS, DEFAULT_CONFIRM_TIMEOUT_SECS, DEFAULT_EXPLORER_TX_BASE,
    DEFAULT_FEE_LAMPORTS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PIN_ENDPOINT, DEFAULT_RPC_URL,
    DEFAULT_TRADE_ENDPOINT,
};
use coinforge_core::{Commitment, ConfirmOptions};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// Environment variable overriding `trade.api_key`
pub const TRADE_API_KEY_ENV: &str = "COINFORGE_TRADE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LaunchConfig {
    #[validate]
    pub solana: SolanaConfig,
    #[validate]
    pub fee: FeeConfig,
    #[validate]
    pub metadata: MetadataConfig,
    #[validate]
    pub trade: TradeConfig,
    #[validate]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SolanaConfig {
    #[validate(url)]
    pub rpc_url: String,
    pub commitment: String,
    #[validate(range(min = 1, max = 600))]
    pub confirm_timeout_secs: u64,
    #[validate(range(min = 50, max = 10000))]
    pub confirm_poll_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FeeConfig {
    /// Base58 address receiving the creation fee
    pub recipient: String,
    #[validate(range(min = 1))]
    pub lamports: u64,
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
pub struct TradeConfig {
    #[validate(url)]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[validate(url)]
    pub explorer_tx_base: String,
    #[serde(flatten)]
    pub params: TradeParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: "confirmed".to_string(),
            confirm_timeout_secs: DEFAULT_CONFIRM_TIMEOUT_SECS,
            confirm_poll_ms: DEFAULT_CONFIRM_POLL_MS,
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            lamports: DEFAULT_FEE_LAMPORTS,
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

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TRADE_ENDPOINT.to_string(),
            api_key: None,
            explorer_tx_base: DEFAULT_EXPLORER_TX_BASE.to_string(),
            params: TradeParams::default(),
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

impl LaunchConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Field ranges plus the cross-field rules derive can't express
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self)?;

        self.fee_terms()?;
        self.commitment()?;
        if self.trade.params.pool.is_empty() {
            return Err(anyhow::anyhow!("Trade pool cannot be empty"));
        }
        if self.trade.params.amount < 0.0 || self.trade.params.priority_fee < 0.0 {
            return Err(anyhow::anyhow!("Trade amounts cannot be negative"));
        }
        Ok(())
    }

    pub fn commitment(&self) -> Result<Commitment> {
        Ok(Commitment::from_str(&self.solana.commitment)?)
    }

    pub fn confirm_options(&self) -> Result<ConfirmOptions> {
        Ok(ConfirmOptions {
            commitment: self.commitment()?,
            timeout: Duration::from_secs(self.solana.confirm_timeout_secs),
            poll_interval: Duration::from_millis(self.solana.confirm_poll_ms),
        })
    }

    pub fn fee_terms(&self) -> Result<FeeTerms> {
        if self.fee.recipient.is_empty() {
            return Err(anyhow::anyhow!("fee.recipient must be set"));
        }
        let recipient = Pubkey::from_str(&self.fee.recipient)
            .with_context(|| format!("Invalid fee recipient: {}", self.fee.recipient))?;
        Ok(FeeTerms {
            recipient,
            lamports: self.fee.lamports,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata.request_timeout_secs)
    }

    /// Trading API key, environment first
    pub fn trade_api_key(&self) -> Result<String> {
        resolve_api_key(std::env::var(TRADE_API_KEY_ENV).ok(), self.trade.api_key.as_deref())
    }

    /// `<explorer base><signature>`
    pub fn explorer_url(&self, signature: &str) -> String {
        format!("{}{}", self.trade.explorer_tx_base, signature)
    }
}

fn resolve_api_key(from_env: Option<String>, from_file: Option<&str>) -> Result<String> {
    from_env
        .filter(|key| !key.is_empty())
        .or_else(|| from_file.filter(|key| !key.is_empty()).map(str::to_string))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Trading API key missing: set trade.api_key or {}",
                TRADE_API_KEY_ENV
            )
        })
}
