//! Client error types

use crate::wallet::WalletError;
use coinforge_core::{LaunchError, ValidationError};
use thiserror::Error;

/// Anything that can abort a launch; `Display` is the message shown to the user
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl From<ValidationError> for FlowError {
    fn from(err: ValidationError) -> Self {
        FlowError::Launch(err.into())
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
