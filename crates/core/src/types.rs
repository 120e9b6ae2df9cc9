//! Token creation request types

use crate::amount::MintAmount;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::path::Path;

/// Raw form values as the user submitted them.
///
/// Text fields are kept as strings so that validation, not parsing, decides
/// what a bad value looks like. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct TokenForm {
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub decimals: Option<String>,
    pub supply: Option<String>,
    pub description: Option<String>,
    pub wallet_address: Option<String>,
    pub website: Option<String>,
    pub x: Option<String>,
    pub telegram: Option<String>,
    pub youtube: Option<String>,
    pub revoke_mint_authority: bool,
    pub revoke_freeze_authority: bool,
    pub image: Option<ImageUpload>,
}

/// An uploaded image file
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Extension of the original file name including the dot (".png"),
    /// or an empty string when there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Optional social links attached to a token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

impl Socials {
    pub fn is_empty(&self) -> bool {
        self.website.is_none() && self.x.is_none() && self.telegram.is_none() && self.youtube.is_none()
    }
}

/// A token request that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedToken {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Supply exactly as entered (digits only, leading zeros preserved)
    pub supply: String,
    pub amount: MintAmount,
    pub description: Option<String>,
    /// Destination wallet; always present for server submissions
    pub wallet: Option<Pubkey>,
    pub socials: Socials,
    pub revoke_mint_authority: bool,
    pub revoke_freeze_authority: bool,
}

/// Treat missing and whitespace-only values the same way
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
