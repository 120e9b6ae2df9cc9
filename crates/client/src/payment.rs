//! Creation fee payment

use crate::error::FlowResult;
use crate::wallet::{WalletProvider, WalletSession};
use coinforge_core::{send_and_confirm_transaction, ConfirmOptions, SolanaRpc};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL, pubkey::Pubkey, signature::Signature, system_instruction,
    transaction::Transaction,
};
use tracing::info;

/// Where the fee goes and how much it is
#[derive(Debug, Clone, Copy)]
pub struct FeeTerms {
    pub recipient: Pubkey,
    pub lamports: u64,
}

impl FeeTerms {
    /// Fee in SOL as shown to the user, e.g. `0.007`
    pub fn sol(&self) -> f64 {
        self.lamports as f64 / LAMPORTS_PER_SOL as f64
    }
}

/// Transfer the fee from the session wallet and wait for confirmation.
///
/// The session wallet pays the network fee and signs; nothing else is signed.
pub async fn pay_fee(
    rpc: &dyn SolanaRpc,
    wallet: &dyn WalletProvider,
    session: &WalletSession,
    terms: &FeeTerms,
    confirm: &ConfirmOptions,
) -> FlowResult<Signature> {
    let transfer = system_instruction::transfer(&session.public_key, &terms.recipient, terms.lamports);
    let mut transaction = Transaction::new_with_payer(&[transfer], Some(&session.public_key));
    transaction.message.recent_blockhash = rpc.get_latest_blockhash().await?;

    let signed = wallet.sign_transaction(transaction).await?;
    let signature = send_and_confirm_transaction(rpc, &signed, confirm).await?;

    info!(
        "Paid {} SOL from {} to {} ({})",
        terms.sol(),
        session.public_key,
        terms.recipient,
        signature
    );
    Ok(signature)
}
