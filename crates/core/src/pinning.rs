//! Metadata pinning client
//!
//! Uploads a token's image and descriptive fields to an IPFS-backed pinning
//! service as a multipart form and returns the metadata descriptor the service
//! hands back.

use crate::error::{LaunchError, LaunchResult};
use crate::types::{ImageUpload, Socials, ValidatedToken};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Everything sent to the pinning service for one token
#[derive(Debug, Clone)]
pub struct PinRequest {
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub decimals: u8,
    pub supply: String,
    pub socials: Socials,
    pub image: Option<ImageUpload>,
}

impl PinRequest {
    pub fn from_token(token: &ValidatedToken, image: Option<ImageUpload>) -> Self {
        Self {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            description: token.description.clone(),
            decimals: token.decimals,
            supply: token.supply.clone(),
            socials: token.socials.clone(),
            image,
        }
    }
}

/// Metadata descriptor returned by the pinning service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

/// Port for metadata pinning
#[async_trait]
pub trait MetadataPinner: Send + Sync {
    async fn pin(&self, request: &PinRequest) -> LaunchResult<PinnedMetadata>;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    metadata: PinResponseMetadata,
    #[serde(rename = "metadataUri")]
    metadata_uri: String,
}

#[derive(Debug, Deserialize)]
struct PinResponseMetadata {
    name: String,
    symbol: String,
}

/// Pinning client speaking the multipart `/api/ipfs` contract
pub struct HttpMetadataPinner {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpMetadataPinner {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> LaunchResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(request: &PinRequest) -> LaunchResult<Form> {
        let mut form = Form::new();

        if let Some(image) = &request.image {
            let mut part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
            if let Some(content_type) = &image.content_type {
                part = part.mime_str(content_type)?;
            }
            form = form.part("file", part);
        }

        form = form
            .text("name", request.name.clone())
            .text("symbol", request.symbol.clone())
            .text("description", request.description.clone().unwrap_or_default())
            .text("decimals", request.decimals.to_string())
            .text("supply", request.supply.clone());

        let socials = &request.socials;
        for (key, value) in [
            ("website", &socials.website),
            ("twitter", &socials.x),
            ("telegram", &socials.telegram),
            ("youtube", &socials.youtube),
        ] {
            if let Some(value) = value {
                form = form.text(key, value.clone());
            }
        }

        Ok(form.text("showName", "true"))
    }
}

#[async_trait]
impl MetadataPinner for HttpMetadataPinner {
    async fn pin(&self, request: &PinRequest) -> LaunchResult<PinnedMetadata> {
        debug!("Pinning metadata for {} to {}", request.symbol, self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(Self::form(request)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LaunchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PinResponse = serde_json::from_str(&body)?;
        info!("Pinned metadata for {} at {}", parsed.metadata.symbol, parsed.metadata_uri);

        Ok(PinnedMetadata {
            name: parsed.metadata.name,
            symbol: parsed.metadata.symbol,
            uri: parsed.metadata_uri,
        })
    }
}
