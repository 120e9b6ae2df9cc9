//! Wallet port and the local keypair implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
    transaction::Transaction,
};
use thiserror::Error;

/// Provider error code for a request the user declined
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors reported by a wallet provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("User rejected the request.")]
    UserRejected,

    #[error("Wallet not installed")]
    NotInstalled,

    #[error("{0}")]
    Other(String),
}

impl WalletError {
    /// Map a provider error code and message the way browser wallets report them
    pub fn from_code(code: Option<i64>, message: &str) -> Self {
        if code == Some(USER_REJECTED_CODE) {
            WalletError::UserRejected
        } else if message.eq_ignore_ascii_case("not installed") {
            WalletError::NotInstalled
        } else {
            WalletError::Other(message.to_string())
        }
    }

    /// Friendly text shown when connecting fails
    pub fn friendly_message(&self) -> &'static str {
        match self {
            WalletError::UserRejected => "No problem! We need your approval to create your token.",
            WalletError::NotInstalled => "Let's get you set up! Install Phantom Wallet to continue.",
            WalletError::Other(_) => "Hmm, something went sideways. Want to try again?",
        }
    }
}

/// A wallet that can reveal its address and sign transactions it did not build
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn is_installed(&self) -> bool;

    async fn connect(&self) -> Result<Pubkey, WalletError>;

    /// Add the wallet's signature to `transaction`
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError>;
}

/// The connected wallet, passed explicitly to every step that needs it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSession {
    pub public_key: Pubkey,
}

impl WalletSession {
    pub fn new(public_key: Pubkey) -> Self {
        Self { public_key }
    }

    /// `ABCD...WXYZ` form used in the connect button label
    pub fn short_address(&self) -> String {
        let address = self.public_key.to_string();
        format!("{}...{}", &address[..4], &address[address.len() - 4..])
    }
}

/// Wallet backed by a keypair file, for the CLI
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    pub fn from_file(path: &str) -> Result<Self> {
        Ok(Self::new(load_keypair(path)?))
    }
}

#[async_trait]
impl WalletProvider for KeypairWallet {
    fn is_installed(&self) -> bool {
        true
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        Ok(self.keypair.pubkey())
    }

    async fn sign_transaction(&self, mut transaction: Transaction) -> Result<Transaction, WalletError> {
        let recent_blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| WalletError::Other(e.to_string()))?;
        Ok(transaction)
    }
}

/// Load a keypair from a file path, expanding ~ if needed
pub fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded_path = if path.starts_with('~') {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        path.replacen('~', &home, 1)
    } else {
        path.to_string()
    };

    read_keypair_file(&expanded_path)
        .map_err(|e| anyhow::anyhow!("Failed to load keypair from {}: {}", expanded_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{hash::Hash, system_instruction};

    #[test]
    fn test_error_codes_map_to_friendly_messages() {
        assert_eq!(
            WalletError::from_code(Some(4001), "User rejected the request.").friendly_message(),
            "No problem! We need your approval to create your token."
        );
        assert_eq!(
            WalletError::from_code(None, "Not Installed"),
            WalletError::NotInstalled
        );
        assert_eq!(
            WalletError::from_code(Some(-32603), "internal").friendly_message(),
            "Hmm, something went sideways. Want to try again?"
        );
    }

    #[test]
    fn test_short_address() {
        let session = WalletSession::new(Pubkey::new_unique());
        let full = session.public_key.to_string();
        let short = session.short_address();
        assert!(short.starts_with(&full[..4]));
        assert!(short.ends_with(&full[full.len() - 4..]));
    }

    #[tokio::test]
    async fn test_keypair_wallet_signs_as_fee_payer() {
        let keypair = Keypair::new();
        let payer = keypair.pubkey();
        let wallet = KeypairWallet::new(keypair);

        let ix = system_instruction::transfer(&payer, &Pubkey::new_unique(), 1);
        let mut tx = Transaction::new_with_payer(&[ix], Some(&payer));
        tx.message.recent_blockhash = Hash::new_unique();

        let signed = wallet.sign_transaction(tx).await.unwrap();
        assert!(signed.is_signed());
        assert!(signed.verify().is_ok());
    }

    #[test]
    fn test_load_keypair_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("id.json");
        let keypair = Keypair::new();
        solana_sdk::signature::write_keypair_file(&keypair, &path).unwrap();

        let loaded = load_keypair(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
        assert!(load_keypair("/nonexistent/id.json").is_err());
    }
}
