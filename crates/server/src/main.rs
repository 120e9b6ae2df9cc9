//! coinforge mint server
//!
//! Accepts token launch forms over HTTP and mints them with the server's payer
//! key.

use anyhow::Result;
use clap::Parser;
use coinforge_core::{HttpMetadataPinner, LightRpcClient};
use coinforge_server::{
    api::{self, ApiState},
    config::ServerConfig,
    keys, MintService, UploadStore,
};
use solana_sdk::signature::Signer;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coinforge-server")]
#[command(about = "Upload-and-mint HTTP endpoint for SPL tokens")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "coinforge-server.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_missing = !std::path::Path::new(&cli.config).exists();
    let mut config = if config_missing {
        ServerConfig::default()
    } else {
        ServerConfig::from_file(&cli.config)?
    };

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    init_logging(&config)?;
    if config_missing {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting coinforge server");
    info!("RPC endpoint: {}", config.solana.rpc_url);
    info!("Pinning endpoint: {}", config.metadata.pin_endpoint);
    info!("Upload directory: {:?}", config.server.upload_dir);

    config.validate()?;
    config.ensure_directories()?;
    let payer = keys::load_payer_from_env(&config.solana.secret_key_env)?;
    info!("Payer: {}", payer.pubkey());

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let rpc = Arc::new(LightRpcClient::new(
        config.solana.rpc_url.clone(),
        config.solana.commitment()?,
    ));
    let pinner = Arc::new(HttpMetadataPinner::new(
        config.metadata.pin_endpoint.clone(),
        config.metadata.request_timeout(),
    )?);
    let mint_service = Arc::new(MintService::new(
        rpc,
        pinner,
        Arc::new(payer),
        config.solana.confirm_options()?,
    ));
    let uploads = Arc::new(UploadStore::new(
        config.server.upload_dir.clone(),
        config.server.public_base_url.clone(),
    ));

    let api_server = api::start_server(ApiState::new(mint_service, uploads), &config.server).await?;

    info!("Server started successfully. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = api_server => {
            info!("API server finished");
        }
    }

    info!("Shutting down coinforge server");
    Ok(())
}

fn init_logging(config: &ServerConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "coinforge_server={},coinforge_core={},tower_http=info",
            log_level, log_level
        )
        .into()
    });

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
