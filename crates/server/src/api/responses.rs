//! API response types

use coinforge_core::Socials;
use serde::{Deserialize, Serialize};

/// Body of every `/create-coin` answer, success or failure
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoinResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<TokenDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreateCoinResponse {
    pub fn success(token_id: String, details: TokenDetails) -> Self {
        Self {
            success: true,
            token_id: Some(token_id),
            details: Some(details),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            token_id: None,
            details: None,
            error: Some(error.into()),
        }
    }
}

/// Input details echoed back after a successful mint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    pub token_name: String,
    pub token_symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub socials: Socials,
}

/// Response for the health probe
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub payer: String,
    pub rpc_url: String,
    pub timestamp: i64,
}
