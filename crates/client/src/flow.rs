//! Launch orchestration: validate, pay the fee, pin metadata, create the token
//!
//! Steps run strictly in sequence and the first failure ends the launch. A fee
//! that was paid before a later failure is not refunded.

use crate::config::LaunchConfig;
use crate::error::FlowResult;
use crate::payment::{pay_fee, FeeTerms};
use crate::trade::{HttpTradeClient, TradeApi, TradeParams, TradeRequest};
use crate::wallet::{WalletProvider, WalletSession};
use coinforge_core::{
    validate_submission, ConfirmOptions, HttpMetadataPinner, LightRpcClient, MetadataPinner,
    PinRequest, SolanaRpc, TokenForm, ValidationError,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use std::sync::Arc;
use tracing::{error, info};

/// Where the submit control is; the label is what the button reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Idle,
    ProcessingPayment,
    CreatingToken,
}

impl FlowStage {
    pub fn label(&self) -> &'static str {
        match self {
            FlowStage::Idle => "Create Token",
            FlowStage::ProcessingPayment => "Processing Payment...",
            FlowStage::CreatingToken => "Creating Token...",
        }
    }

    /// Submission is only possible while idle
    pub fn accepts_submit(&self) -> bool {
        matches!(self, FlowStage::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Receives progress of a launch
pub trait FlowObserver: Send + Sync {
    fn on_stage(&self, stage: FlowStage);

    fn on_notice(&self, kind: NoticeKind, message: &str);
}

/// Everything a finished launch produced
#[derive(Debug, Clone)]
pub struct LaunchReceipt {
    pub payment_signature: Signature,
    pub mint: Pubkey,
    pub trade_signature: String,
    pub explorer_url: String,
}

pub struct LaunchFlow {
    rpc: Arc<dyn SolanaRpc>,
    pinner: Arc<dyn MetadataPinner>,
    trade: Arc<dyn TradeApi>,
    fee: FeeTerms,
    confirm: ConfirmOptions,
    trade_params: TradeParams,
    explorer_tx_base: String,
}

impl LaunchFlow {
    pub fn new(
        rpc: Arc<dyn SolanaRpc>,
        pinner: Arc<dyn MetadataPinner>,
        trade: Arc<dyn TradeApi>,
        fee: FeeTerms,
        confirm: ConfirmOptions,
        trade_params: TradeParams,
        explorer_tx_base: impl Into<String>,
    ) -> Self {
        Self {
            rpc,
            pinner,
            trade,
            fee,
            confirm,
            trade_params,
            explorer_tx_base: explorer_tx_base.into(),
        }
    }

    /// Wire the HTTP and RPC clients described by `config`
    pub fn from_config(config: &LaunchConfig) -> anyhow::Result<Self> {
        let rpc = Arc::new(LightRpcClient::new(
            config.solana.rpc_url.clone(),
            config.commitment()?,
        ));
        let pinner = Arc::new(HttpMetadataPinner::new(
            config.metadata.pin_endpoint.clone(),
            config.request_timeout(),
        )?);
        let trade = Arc::new(HttpTradeClient::new(
            config.trade.endpoint.clone(),
            config.trade_api_key()?,
            config.request_timeout(),
        )?);

        Ok(Self::new(
            rpc,
            pinner,
            trade,
            config.fee_terms()?,
            config.confirm_options()?,
            config.trade.params.clone(),
            config.trade.explorer_tx_base.clone(),
        ))
    }

    pub fn fee(&self) -> &FeeTerms {
        &self.fee
    }

    /// Run one launch. The observer always ends at [`FlowStage::Idle`].
    pub async fn launch(
        &self,
        wallet: &dyn WalletProvider,
        session: Option<&WalletSession>,
        mut form: TokenForm,
        observer: &dyn FlowObserver,
    ) -> FlowResult<LaunchReceipt> {
        form.wallet_address = session.map(|s| s.public_key.to_string());

        let result = self.run(wallet, session, form, observer).await;
        match &result {
            Ok(receipt) => info!("Launch finished: mint {}", receipt.mint),
            Err(err) => {
                error!("Launch failed: {}", err);
                observer.on_notice(NoticeKind::Error, &err.to_string());
            }
        }
        observer.on_stage(FlowStage::Idle);
        result
    }

    async fn run(
        &self,
        wallet: &dyn WalletProvider,
        session: Option<&WalletSession>,
        form: TokenForm,
        observer: &dyn FlowObserver,
    ) -> FlowResult<LaunchReceipt> {
        let token = validate_submission(&form)?;
        let Some(session) = session else {
            return Err(ValidationError::WalletNotConnected.into());
        };

        observer.on_stage(FlowStage::ProcessingPayment);
        let payment_signature =
            pay_fee(self.rpc.as_ref(), wallet, session, &self.fee, &self.confirm).await?;
        observer.on_notice(
            NoticeKind::Success,
            &format!("Payment of {} SOL successful!", self.fee.sol()),
        );

        observer.on_stage(FlowStage::CreatingToken);
        let mint = Keypair::new();
        let metadata = self
            .pinner
            .pin(&PinRequest::from_token(&token, form.image))
            .await?;

        let request = TradeRequest::create(
            metadata,
            &mint,
            &self.trade_params,
            token.revoke_mint_authority,
            token.revoke_freeze_authority,
        );
        let trade_signature = self.trade.create_token(&request).await?;

        let explorer_url = format!("{}{}", self.explorer_tx_base, trade_signature);
        observer.on_notice(
            NoticeKind::Success,
            &format!("Token created successfully! Transaction: {}", explorer_url),
        );

        Ok(LaunchReceipt {
            payment_signature,
            mint: mint.pubkey(),
            trade_signature,
            explorer_url,
        })
    }
}
