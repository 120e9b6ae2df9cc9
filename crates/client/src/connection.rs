//! Wallet connection state machine
//!
//! `Idle -> ConsentPending -> Connecting -> Connected | Error`. Declining consent
//! goes back to `Idle`; `disconnect` drops the session from any state.

use crate::wallet::{WalletError, WalletProvider, WalletSession};
use std::sync::Arc;
use tracing::{info, warn};

/// Shown before the wallet is asked for anything
pub const CONSENT_TITLE: &str = "Connect Your Wallet to Create Tokens";

pub const CONSENT_TEXT: &str = "To create your Solana token, we need to:
1. Connect to your wallet address to send your new tokens.
2. Request approval for the 0.007 SOL creation fee.
3. Automatically return your created tokens to your wallet.

Your wallet remains secure through Phantom's trusted interface.
You'll confirm every transaction directly in your wallet.";

/// Notice after the user declines the consent prompt
pub const CONSENT_DECLINED_NOTICE: &str = "Wallet connection is required to create your token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    ConsentPending,
    Connecting,
    Connected(WalletSession),
    /// Friendly message of the failure
    Error(String),
}

pub struct WalletConnector {
    provider: Arc<dyn WalletProvider>,
    state: ConnectionState,
}

impl WalletConnector {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            state: ConnectionState::Idle,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn session(&self) -> Option<WalletSession> {
        match self.state {
            ConnectionState::Connected(session) => Some(session),
            _ => None,
        }
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    /// Ask for consent. A live session is kept as is.
    pub fn request_connect(&mut self) -> &ConnectionState {
        if !matches!(self.state, ConnectionState::Connected(_)) {
            self.state = ConnectionState::ConsentPending;
        }
        &self.state
    }

    /// Answer the consent prompt. Declining returns `Ok(None)` and the
    /// connector goes back to `Idle`.
    pub async fn respond_to_consent(
        &mut self,
        accepted: bool,
    ) -> Result<Option<WalletSession>, WalletError> {
        if self.state != ConnectionState::ConsentPending {
            return Err(WalletError::Other("No connection request is pending".to_string()));
        }

        if !accepted {
            info!("{}", CONSENT_DECLINED_NOTICE);
            self.state = ConnectionState::Idle;
            return Ok(None);
        }

        if !self.provider.is_installed() {
            return Err(self.fail(WalletError::NotInstalled));
        }

        self.state = ConnectionState::Connecting;
        match self.provider.connect().await {
            Ok(public_key) => {
                let session = WalletSession::new(public_key);
                info!("Connected wallet {}", public_key);
                self.state = ConnectionState::Connected(session);
                Ok(Some(session))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Consent and connect in one step
    pub async fn connect(&mut self) -> Result<WalletSession, WalletError> {
        if let Some(session) = self.session() {
            return Ok(session);
        }
        self.request_connect();
        self.respond_to_consent(true)
            .await?
            .ok_or_else(|| WalletError::Other("Connection was not established".to_string()))
    }

    pub fn disconnect(&mut self) {
        if let Some(session) = self.session() {
            info!("Disconnected wallet {}", session.public_key);
        }
        self.state = ConnectionState::Idle;
    }

    fn fail(&mut self, err: WalletError) -> WalletError {
        warn!("Wallet connection failed: {}", err);
        self.state = ConnectionState::Error(err.friendly_message().to_string());
        err
    }
}
