//! Trading API contract tests against a local stub service

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use coinforge_client::{
    trade::TRADE_FALLBACK_ERROR, HttpTradeClient, TradeApi, TradeParams, TradeRequest,
};
use coinforge_core::{LaunchError, PinnedMetadata};
use serde_json::{json, Value};
use solana_sdk::signature::Keypair;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Captured {
    api_key: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<Option<Value>>>,
}

async fn spawn(app: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}/api/trade", addr))
}

async fn accept(
    State(captured): State<Captured>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    *captured.api_key.lock().unwrap() = query.get("api-key").cloned();
    *captured.body.lock().unwrap() = Some(body);
    Json(json!({ "signature": "5xTradeSig" })).into_response()
}

fn request() -> TradeRequest {
    TradeRequest::create(
        PinnedMetadata {
            name: "Forge".to_string(),
            symbol: "FRG".to_string(),
            uri: "https://ipfs.io/ipfs/QmForge".to_string(),
        },
        &Keypair::new(),
        &TradeParams::default(),
        false,
        true,
    )
}

#[tokio::test]
async fn test_create_sends_key_and_payload() -> Result<()> {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/trade", post(accept))
        .with_state(captured.clone());
    let endpoint = spawn(app).await?;

    let client = HttpTradeClient::new(endpoint, "test-key", Duration::from_secs(5))?;
    let signature = client.create_token(&request()).await?;

    assert_eq!(signature, "5xTradeSig");
    assert_eq!(captured.api_key.lock().unwrap().as_deref(), Some("test-key"));
    let body = captured.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["action"], "create");
    assert_eq!(body["tokenMetadata"]["symbol"], "FRG");
    assert_eq!(body["revokeFreezeAuthority"], true);

    Ok(())
}

#[tokio::test]
async fn test_non_200_surfaces_raw_body() -> Result<()> {
    let app = Router::new().route(
        "/api/trade",
        post(|| async { (StatusCode::BAD_REQUEST, "Mint already exists") }),
    );
    let endpoint = spawn(app).await?;

    let client = HttpTradeClient::new(endpoint, "test-key", Duration::from_secs(5))?;
    let err = client.create_token(&request()).await.unwrap_err();

    match &err {
        LaunchError::Upstream { status, .. } => assert_eq!(*status, 400),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "Mint already exists");

    Ok(())
}

#[tokio::test]
async fn test_other_success_codes_are_failures() -> Result<()> {
    let app = Router::new().route("/api/trade", post(|| async { StatusCode::ACCEPTED }));
    let endpoint = spawn(app).await?;

    let client = HttpTradeClient::new(endpoint, "test-key", Duration::from_secs(5))?;
    let err = client.create_token(&request()).await.unwrap_err();

    assert_eq!(err.to_string(), TRADE_FALLBACK_ERROR);

    Ok(())
}
