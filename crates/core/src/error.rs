//! Error taxonomy shared by the launch paths

use std::time::Duration;
use thiserror::Error;

/// Input problems caught before any network call.
///
/// The `Display` output of every variant is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please connect your wallet to create a token.")]
    WalletNotConnected,

    #[error("Please fill out all the required fields and upload an image.")]
    MissingFields,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid wallet address")]
    InvalidWalletAddress,

    #[error("Decimals must be a number between 0 and 9.")]
    InvalidDecimals,

    #[error("Supply must be a positive integer.")]
    InvalidSupply,

    #[error("Total mint amount {amount} exceeds the on-chain maximum of {} base units", u64::MAX)]
    AmountOverflow { amount: String },

    #[error("File size exceeds {limit_mb}MB limit")]
    ImageTooLarge { size: usize, limit_mb: usize },

    #[error("Image must be maximum {max_width}x{max_height} pixels")]
    ImageDimensions {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Error loading image")]
    ImageUnreadable,
}

/// Main error type for launch operations
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A third-party service answered with a non-success status.
    /// The raw response body is the whole message.
    #[error("{body}")]
    Upstream { status: u16, body: String },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction {signature} was not confirmed within {timeout:?}")]
    ConfirmationTimeout { signature: String, timeout: Duration },

    #[error("Failed to build instruction: {0}")]
    Instruction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for launch operations
pub type LaunchResult<T> = Result<T, LaunchError>;

impl From<serde_json::Error> for LaunchError {
    fn from(err: serde_json::Error) -> Self {
        LaunchError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for LaunchError {
    fn from(err: bincode::Error) -> Self {
        LaunchError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for LaunchError {
    fn from(err: reqwest::Error) -> Self {
        LaunchError::Http(err.to_string())
    }
}

impl From<ureq::Error> for LaunchError {
    fn from(err: ureq::Error) -> Self {
        LaunchError::Rpc(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_raw_body() {
        let err = LaunchError::Upstream {
            status: 500,
            body: "pool not found".to_string(),
        };
        assert_eq!(err.to_string(), "pool not found");
    }

    #[test]
    fn test_validation_messages_pass_through() {
        let err: LaunchError = ValidationError::InvalidWalletAddress.into();
        assert_eq!(err.to_string(), "Invalid wallet address");
        assert_eq!(
            ValidationError::MissingField("tokenName").to_string(),
            "tokenName is required"
        );
    }
}
