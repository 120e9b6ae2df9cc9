//! Trading API client that creates the token on the launch platform

use async_trait::async_trait;
use coinforge_core::{LaunchError, LaunchResult, PinnedMetadata};
use serde::{Deserialize, Serialize};
use solana_sdk::signature::Keypair;
use std::time::Duration;
use tracing::{debug, info};

/// Message used when the trading API fails without a body
pub const TRADE_FALLBACK_ERROR: &str = "Failed to create token. Please try again.";

/// Dev-buy and routing parameters sent with every create request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeParams {
    /// Initial buy, denominated in SOL
    pub amount: f64,
    pub slippage: f64,
    pub priority_fee: f64,
    pub pool: String,
}

impl Default for TradeParams {
    fn default() -> Self {
        Self {
            amount: 0.000001,
            slippage: 1.0,
            priority_fee: 0.000001,
            pool: "pump".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl From<PinnedMetadata> for TokenMetadata {
    fn from(pinned: PinnedMetadata) -> Self {
        Self {
            name: pinned.name,
            symbol: pinned.symbol,
            uri: pinned.uri,
        }
    }
}

/// JSON body of a create request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub action: String,
    pub token_metadata: TokenMetadata,
    /// Base58 secret key of the new mint
    pub mint: String,
    pub denominated_in_sol: String,
    pub amount: f64,
    pub slippage: f64,
    pub priority_fee: f64,
    pub pool: String,
    pub revoke_mint_authority: bool,
    pub revoke_freeze_authority: bool,
}

impl TradeRequest {
    pub fn create(
        metadata: PinnedMetadata,
        mint: &Keypair,
        params: &TradeParams,
        revoke_mint_authority: bool,
        revoke_freeze_authority: bool,
    ) -> Self {
        Self {
            action: "create".to_string(),
            token_metadata: metadata.into(),
            mint: mint.to_base58_string(),
            denominated_in_sol: "true".to_string(),
            amount: params.amount,
            slippage: params.slippage,
            priority_fee: params.priority_fee,
            pool: params.pool.clone(),
            revoke_mint_authority,
            revoke_freeze_authority,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TradeResponse {
    signature: String,
}

/// Creates the token on the launch platform and returns its transaction signature
#[async_trait]
pub trait TradeApi: Send + Sync {
    async fn create_token(&self, request: &TradeRequest) -> LaunchResult<String>;
}

pub struct HttpTradeClient {
    endpoint: String,
    api_key: String,
    http: reqwest::Client,
}

impl HttpTradeClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> LaunchResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            http,
        })
    }
}

#[async_trait]
impl TradeApi for HttpTradeClient {
    async fn create_token(&self, request: &TradeRequest) -> LaunchResult<String> {
        debug!("Requesting token creation for {}", request.token_metadata.symbol);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("api-key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            return Err(LaunchError::Upstream {
                status: status.as_u16(),
                body: if body.is_empty() {
                    TRADE_FALLBACK_ERROR.to_string()
                } else {
                    body
                },
            });
        }

        let parsed: TradeResponse = serde_json::from_str(&body)?;
        info!("Token creation submitted: {}", parsed.signature);
        Ok(parsed.signature)
    }
}
