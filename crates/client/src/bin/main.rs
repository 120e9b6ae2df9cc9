// CLI for launching tokens through the pay-then-create flow
//
// A local keypair file stands in for the browser wallet.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use coinforge_client::{
    config::LaunchConfig,
    connection::{CONSENT_DECLINED_NOTICE, CONSENT_TEXT, CONSENT_TITLE},
    flow::NoticeKind,
    preview::{preview_image, read_image_file},
    FlowObserver, FlowStage, KeypairWallet, LaunchFlow, WalletConnector,
};
use coinforge_core::{ImageConstraints, TokenForm};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coinforge")]
#[command(about = "Pay the creation fee and launch a token", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "coinforge.toml")]
    config: String,

    /// Path to wallet keypair file
    #[arg(long, default_value = "~/.config/solana/id.json")]
    wallet: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an image against the upload limits
    CheckImage {
        /// Image file
        path: PathBuf,
    },

    /// Pay the fee and create a token
    Launch(LaunchCmd),
}

#[derive(Args)]
struct LaunchCmd {
    #[arg(long)]
    name: String,

    #[arg(long)]
    symbol: String,

    /// Decimal places (0-9)
    #[arg(long)]
    decimals: String,

    /// Whole-token supply
    #[arg(long)]
    supply: String,

    /// Token image (max 2MB, 500x500)
    #[arg(long)]
    image: PathBuf,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    website: Option<String>,

    #[arg(long)]
    x: Option<String>,

    #[arg(long)]
    telegram: Option<String>,

    #[arg(long)]
    youtube: Option<String>,

    /// Give up the mint authority
    #[arg(long)]
    revoke_mint: bool,

    /// Give up the freeze authority
    #[arg(long)]
    revoke_freeze: bool,

    /// Accept the wallet consent prompt without asking
    #[arg(short, long)]
    yes: bool,
}

/// Prints stages and notices to the terminal
struct ConsoleObserver;

impl FlowObserver for ConsoleObserver {
    fn on_stage(&self, stage: FlowStage) {
        if stage != FlowStage::Idle {
            println!("[INFO] {}", stage.label());
        }
    }

    fn on_notice(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => println!("[OK] {}", message),
            NoticeKind::Error => eprintln!("[ERROR] {}", message),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_missing = !std::path::Path::new(&cli.config).exists();
    let mut config = if config_missing {
        LaunchConfig::default()
    } else {
        LaunchConfig::from_file(&cli.config)?
    };
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    init_logging(&config)?;
    if config_missing {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    match cli.command {
        Commands::CheckImage { path } => {
            let preview = preview_image(read_image_file(&path)?, &ImageConstraints::default())?;
            println!(
                "[OK] {} is {}x{} ({} bytes)",
                preview.upload.file_name,
                preview.dimensions.width,
                preview.dimensions.height,
                preview.upload.len()
            );
            Ok(())
        }
        Commands::Launch(cmd) => launch(cmd, &cli.wallet, &config).await,
    }
}

async fn launch(cmd: LaunchCmd, wallet_path: &str, config: &LaunchConfig) -> Result<()> {
    config.validate()?;
    let flow = LaunchFlow::from_config(config)?;

    let image = preview_image(read_image_file(&cmd.image)?, &ImageConstraints::default())?;

    let wallet = Arc::new(KeypairWallet::from_file(wallet_path)?);
    let mut connector = WalletConnector::new(wallet.clone());

    connector.request_connect();
    println!("{}\n\n{}\n", CONSENT_TITLE, CONSENT_TEXT);
    let accepted = cmd.yes || confirm("Connect wallet and continue?")?;
    let session = match connector.respond_to_consent(accepted).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            println!("[INFO] {}", CONSENT_DECLINED_NOTICE);
            return Ok(());
        }
        Err(err) => return Err(anyhow::anyhow!(err.friendly_message())),
    };
    println!("[INFO] Connected ({})", session.short_address());

    let form = TokenForm {
        token_name: Some(cmd.name),
        token_symbol: Some(cmd.symbol),
        decimals: Some(cmd.decimals),
        supply: Some(cmd.supply),
        description: cmd.description,
        website: cmd.website,
        x: cmd.x,
        telegram: cmd.telegram,
        youtube: cmd.youtube,
        revoke_mint_authority: cmd.revoke_mint,
        revoke_freeze_authority: cmd.revoke_freeze,
        image: Some(image.upload),
        ..Default::default()
    };

    // the observer has already reported any failure
    match flow
        .launch(wallet.as_ref(), connector.session().as_ref(), form, &ConsoleObserver)
        .await
    {
        Ok(receipt) => {
            println!("[INFO] Mint: {}", receipt.mint);
            Ok(())
        }
        Err(_) => std::process::exit(1),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn init_logging(config: &LaunchConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("coinforge_client={},coinforge_core={}", log_level, log_level).into()
    });

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
