//! In-memory doubles for the RPC and pinning ports
//!
//! Enabled for downstream crates with the `testing` feature.

use crate::error::{LaunchError, LaunchResult};
use crate::pinning::{MetadataPinner, PinRequest, PinnedMetadata};
use crate::rpc::{Commitment, SignatureStatus, SolanaRpc};
use async_trait::async_trait;
use serde_json::json;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use std::collections::HashSet;
use std::sync::Mutex;

/// How [`MockRpc`] answers signature status queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBehavior {
    /// Confirmed on the first poll
    Confirmed,
    /// Processed on the first poll, confirmed afterwards
    ProcessedThenConfirmed,
    /// The cluster never reports the signature
    NeverSeen,
    /// Landed with an instruction error
    Failed,
}

#[derive(Default)]
struct MockState {
    sent: Vec<Transaction>,
    polls: usize,
    existing: HashSet<Pubkey>,
}

/// Chain double that records every submitted transaction
pub struct MockRpc {
    state: Mutex<MockState>,
    status: StatusBehavior,
    send_error: Option<String>,
    rent_exempt_lamports: u64,
    balance: u64,
}

impl Default for MockRpc {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRpc {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            status: StatusBehavior::Confirmed,
            send_error: None,
            rent_exempt_lamports: 1_461_600,
            balance: 1_000_000_000,
        }
    }

    pub fn with_status(mut self, status: StatusBehavior) -> Self {
        self.status = status;
        self
    }

    /// Make `sendTransaction` fail with this message
    pub fn rejecting_sends(mut self, message: impl Into<String>) -> Self {
        self.send_error = Some(message.into());
        self
    }

    pub fn with_existing_account(self, pubkey: Pubkey) -> Self {
        self.lock().existing.insert(pubkey);
        self
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.lock().sent.clone()
    }

    pub fn send_count(&self) -> usize {
        self.lock().sent.len()
    }

    pub fn status_polls(&self) -> usize {
        self.lock().polls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn status(slot: u64, level: Commitment, err: Option<serde_json::Value>) -> SignatureStatus {
        SignatureStatus {
            slot,
            confirmations: Some(1),
            err,
            confirmation_status: Some(level),
        }
    }
}

#[async_trait]
impl SolanaRpc for MockRpc {
    fn url(&self) -> String {
        "mock://solana".to_string()
    }

    async fn get_latest_blockhash(&self) -> LaunchResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> LaunchResult<Signature> {
        if let Some(message) = &self.send_error {
            return Err(LaunchError::Rpc(message.clone()));
        }
        let signature = transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| LaunchError::Rpc("Transaction has no signatures".to_string()))?;
        self.lock().sent.push(transaction.clone());
        Ok(signature)
    }

    async fn get_signature_status(&self, signature: &Signature) -> LaunchResult<Option<SignatureStatus>> {
        let mut state = self.lock();
        state.polls += 1;

        let known = state.sent.iter().any(|tx| tx.signatures.first() == Some(signature));
        if !known {
            return Ok(None);
        }

        let slot = state.polls as u64;
        Ok(match self.status {
            StatusBehavior::Confirmed => Some(Self::status(slot, Commitment::Confirmed, None)),
            StatusBehavior::ProcessedThenConfirmed if state.polls == 1 => {
                Some(Self::status(slot, Commitment::Processed, None))
            }
            StatusBehavior::ProcessedThenConfirmed => Some(Self::status(slot, Commitment::Confirmed, None)),
            StatusBehavior::NeverSeen => None,
            StatusBehavior::Failed => Some(Self::status(
                slot,
                Commitment::Confirmed,
                Some(json!({ "InstructionError": [0, "Custom"] })),
            )),
        })
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> LaunchResult<u64> {
        Ok(self.rent_exempt_lamports)
    }

    async fn get_balance(&self, _pubkey: &Pubkey) -> LaunchResult<u64> {
        Ok(self.balance)
    }

    async fn account_exists(&self, pubkey: &Pubkey) -> LaunchResult<bool> {
        Ok(self.lock().existing.contains(pubkey))
    }
}

/// Pinning double that echoes the request back as a descriptor
#[derive(Default)]
pub struct MockPinner {
    requests: Mutex<Vec<PinRequest>>,
    failure: Option<(u16, String)>,
}

impl MockPinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with this upstream status and body
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some((status, body.into())),
        }
    }

    pub fn requests(&self) -> Vec<PinRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl MetadataPinner for MockPinner {
    async fn pin(&self, request: &PinRequest) -> LaunchResult<PinnedMetadata> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        if let Some((status, body)) = &self.failure {
            return Err(LaunchError::Upstream {
                status: *status,
                body: body.clone(),
            });
        }

        Ok(PinnedMetadata {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            uri: format!("https://ipfs.test/{}", request.symbol.to_lowercase()),
        })
    }
}
