//! Launch orchestration tests with in-memory chain, pinning, trade and wallet doubles

mod common;

use anyhow::Result;
use coinforge_client::{
    flow::NoticeKind, payment::FeeTerms, FlowStage, LaunchFlow, TradeParams, WalletError,
    WalletSession,
};
use coinforge_core::testing::{MockPinner, MockRpc, StatusBehavior};
use coinforge_core::ConfirmOptions;
use common::{form, MockTrade, MockWallet, RecordingObserver};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program,
};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    flow: LaunchFlow,
    rpc: Arc<MockRpc>,
    pinner: Arc<MockPinner>,
    trade: Arc<MockTrade>,
    recipient: Pubkey,
}

fn harness_with(rpc: MockRpc, pinner: MockPinner, trade: MockTrade) -> Harness {
    let rpc = Arc::new(rpc);
    let pinner = Arc::new(pinner);
    let trade = Arc::new(trade);
    let recipient = Pubkey::new_unique();

    let flow = LaunchFlow::new(
        rpc.clone(),
        pinner.clone(),
        trade.clone(),
        FeeTerms {
            recipient,
            lamports: 7_000_000,
        },
        ConfirmOptions {
            timeout: Duration::from_millis(50),
            poll_interval: Duration::from_millis(5),
            ..Default::default()
        },
        TradeParams::default(),
        "https://solscan.io/tx/",
    );

    Harness {
        flow,
        rpc,
        pinner,
        trade,
        recipient,
    }
}

fn harness() -> Harness {
    harness_with(MockRpc::new(), MockPinner::new(), MockTrade::default())
}

#[tokio::test]
async fn test_successful_launch() -> Result<()> {
    let h = harness();
    let wallet = MockWallet::new();
    let session = WalletSession::new(wallet.pubkey());
    let observer = RecordingObserver::default();

    let receipt = h.flow.launch(&wallet, Some(&session), form(), &observer).await?;

    assert_eq!(receipt.trade_signature, "5xTradeSig");
    assert_eq!(receipt.explorer_url, "https://solscan.io/tx/5xTradeSig");
    assert_eq!(
        observer.stages(),
        vec![FlowStage::ProcessingPayment, FlowStage::CreatingToken, FlowStage::Idle]
    );
    assert_eq!(
        observer.notices(),
        vec![
            (NoticeKind::Success, "Payment of 0.007 SOL successful!".to_string()),
            (
                NoticeKind::Success,
                "Token created successfully! Transaction: https://solscan.io/tx/5xTradeSig".to_string()
            ),
        ]
    );

    // exactly one fee transfer, paid and signed by the session wallet
    let sent = h.rpc.sent_transactions();
    assert_eq!(sent.len(), 1);
    let message = &sent[0].message;
    assert_eq!(message.account_keys[0], wallet.pubkey());
    assert!(message.account_keys.contains(&h.recipient));
    assert!(message.account_keys.contains(&system_program::id()));
    assert_eq!(receipt.payment_signature, sent[0].signatures[0]);

    let pinned = h.pinner.requests();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].decimals, 6);
    assert_eq!(pinned[0].supply, "1000000");
    assert!(pinned[0].image.is_some());

    let trades = h.trade.requests();
    assert_eq!(trades.len(), 1);
    assert!(trades[0].revoke_mint_authority);
    assert!(!trades[0].revoke_freeze_authority);
    assert_eq!(trades[0].token_metadata.uri, "https://ipfs.test/frg");
    assert_eq!(Keypair::from_base58_string(&trades[0].mint).pubkey(), receipt.mint);

    Ok(())
}

#[tokio::test]
async fn test_missing_session_is_reported_first() -> Result<()> {
    let h = harness();
    let observer = RecordingObserver::default();
    let mut incomplete = form();
    incomplete.token_name = None;

    let err = h
        .flow
        .launch(&MockWallet::new(), None, incomplete, &observer)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Please connect your wallet to create a token.");
    assert_eq!(observer.stages(), vec![FlowStage::Idle]);
    assert_eq!(h.rpc.send_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_missing_image_blocks_payment() -> Result<()> {
    let h = harness();
    let wallet = MockWallet::new();
    let session = WalletSession::new(wallet.pubkey());
    let observer = RecordingObserver::default();
    let mut no_image = form();
    no_image.image = None;

    let err = h
        .flow
        .launch(&wallet, Some(&session), no_image, &observer)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Please fill out all the required fields and upload an image."
    );
    assert_eq!(h.rpc.send_count(), 0);
    assert_eq!(
        observer.notices(),
        vec![(NoticeKind::Error, err.to_string())]
    );

    Ok(())
}

#[tokio::test]
async fn test_rejected_signature_stops_before_pinning() -> Result<()> {
    let h = harness();
    let mut wallet = MockWallet::new();
    wallet.sign_error = Some(WalletError::UserRejected);
    let session = WalletSession::new(wallet.pubkey());
    let observer = RecordingObserver::default();

    let err = h
        .flow
        .launch(&wallet, Some(&session), form(), &observer)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "User rejected the request.");
    assert_eq!(h.rpc.send_count(), 0);
    assert!(h.pinner.requests().is_empty());
    assert!(h.trade.requests().is_empty());
    assert_eq!(
        observer.stages(),
        vec![FlowStage::ProcessingPayment, FlowStage::Idle]
    );

    Ok(())
}

#[tokio::test]
async fn test_failed_payment_never_reaches_trade() -> Result<()> {
    let h = harness_with(
        MockRpc::new().with_status(StatusBehavior::Failed),
        MockPinner::new(),
        MockTrade::default(),
    );
    let wallet = MockWallet::new();
    let session = WalletSession::new(wallet.pubkey());

    let result = h
        .flow
        .launch(&wallet, Some(&session), form(), &RecordingObserver::default())
        .await;

    assert!(result.is_err());
    assert_eq!(h.rpc.send_count(), 1);
    assert!(h.pinner.requests().is_empty());
    assert!(h.trade.requests().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unconfirmed_payment_times_out() -> Result<()> {
    let h = harness_with(
        MockRpc::new().with_status(StatusBehavior::NeverSeen),
        MockPinner::new(),
        MockTrade::default(),
    );
    let wallet = MockWallet::new();
    let session = WalletSession::new(wallet.pubkey());

    let err = h
        .flow
        .launch(&wallet, Some(&session), form(), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("was not confirmed"));
    assert!(h.pinner.requests().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_trade_rejection_surfaces_raw_body() -> Result<()> {
    let h = harness_with(
        MockRpc::new(),
        MockPinner::new(),
        MockTrade::failing(400, "Invalid pool"),
    );
    let wallet = MockWallet::new();
    let session = WalletSession::new(wallet.pubkey());
    let observer = RecordingObserver::default();

    let err = h
        .flow
        .launch(&wallet, Some(&session), form(), &observer)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid pool");
    // the fee was already paid
    assert_eq!(h.rpc.send_count(), 1);
    let notices = observer.notices();
    assert_eq!(notices.last(), Some(&(NoticeKind::Error, "Invalid pool".to_string())));
    assert_eq!(observer.stages().last(), Some(&FlowStage::Idle));

    Ok(())
}

#[tokio::test]
async fn test_pinning_failure_skips_trade() -> Result<()> {
    let h = harness_with(
        MockRpc::new(),
        MockPinner::failing(500, "ipfs down"),
        MockTrade::default(),
    );
    let wallet = MockWallet::new();
    let session = WalletSession::new(wallet.pubkey());

    let err = h
        .flow
        .launch(&wallet, Some(&session), form(), &RecordingObserver::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "ipfs down");
    assert!(h.trade.requests().is_empty());

    Ok(())
}
