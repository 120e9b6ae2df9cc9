//! coinforge core
//!
//! Shared building blocks for both token-creation paths:
//! - Token form types and field validation
//! - Mint amount math (supply x 10^decimals, arbitrary precision)
//! - Image upload limits
//! - Lightweight Solana JSON-RPC client and confirmation polling
//! - Metadata pinning client

pub mod amount;
pub mod constants;
pub mod error;
pub mod image_limits;
pub mod pinning;
pub mod rpc;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use amount::MintAmount;
pub use error::{LaunchError, LaunchResult, ValidationError};
pub use image_limits::{ImageConstraints, ImageDimensions};
pub use pinning::{HttpMetadataPinner, MetadataPinner, PinRequest, PinnedMetadata};
pub use rpc::{
    confirm_transaction, send_and_confirm_transaction, Commitment, ConfirmOptions, LightRpcClient,
    SignatureStatus, SolanaRpc,
};
pub use types::{ImageUpload, Socials, TokenForm, ValidatedToken};
pub use validation::{validate_server_submission, validate_submission};
