//! Doubles shared by the client integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use coinforge_client::{
    flow::NoticeKind, FlowObserver, FlowStage, TradeApi, TradeRequest, WalletError,
    WalletProvider,
};
use coinforge_core::{ImageUpload, LaunchError, LaunchResult, TokenForm};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::sync::Mutex;

/// Wallet double with scripted behaviour
pub struct MockWallet {
    keypair: Keypair,
    pub installed: bool,
    pub connect_error: Option<WalletError>,
    pub sign_error: Option<WalletError>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            keypair: Keypair::new(),
            installed: true,
            connect_error: None,
            sign_error: None,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn is_installed(&self) -> bool {
        self.installed
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        match &self.connect_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.keypair.pubkey()),
        }
    }

    async fn sign_transaction(&self, mut transaction: Transaction) -> Result<Transaction, WalletError> {
        if let Some(err) = &self.sign_error {
            return Err(err.clone());
        }
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| WalletError::Other(e.to_string()))?;
        Ok(transaction)
    }
}

/// Trading API double
#[derive(Default)]
pub struct MockTrade {
    requests: Mutex<Vec<TradeRequest>>,
    failure: Option<(u16, String)>,
}

impl MockTrade {
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some((status, body.to_string())),
        }
    }

    pub fn requests(&self) -> Vec<TradeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeApi for MockTrade {
    async fn create_token(&self, request: &TradeRequest) -> LaunchResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.failure {
            Some((status, body)) => Err(LaunchError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            None => Ok("5xTradeSig".to_string()),
        }
    }
}

/// Records everything the flow reports
#[derive(Default)]
pub struct RecordingObserver {
    pub stages: Mutex<Vec<FlowStage>>,
    pub notices: Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingObserver {
    pub fn stages(&self) -> Vec<FlowStage> {
        self.stages.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices.lock().unwrap().clone()
    }
}

impl FlowObserver for RecordingObserver {
    fn on_stage(&self, stage: FlowStage) {
        self.stages.lock().unwrap().push(stage);
    }

    fn on_notice(&self, kind: NoticeKind, message: &str) {
        self.notices.lock().unwrap().push((kind, message.to_string()));
    }
}

pub fn form() -> TokenForm {
    TokenForm {
        token_name: Some("Forge".to_string()),
        token_symbol: Some("FRG".to_string()),
        decimals: Some("6".to_string()),
        supply: Some("1000000".to_string()),
        description: Some("forged on chain".to_string()),
        x: Some("https://x.com/forge".to_string()),
        revoke_mint_authority: true,
        image: Some(ImageUpload::new("logo.png", vec![0x89, 0x50, 0x4e, 0x47]).with_content_type("image/png")),
        ..Default::default()
    }
}
