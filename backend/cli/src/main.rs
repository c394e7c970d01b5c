use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use photodrop_channels::{ChannelAdapter, TelegramAdapter};
use photodrop_config::defaults::DEFAULT_PORT;
use photodrop_config::RelayConfig;
use photodrop_core::{Component, RecipientId, RelayBus};
use photodrop_relay::RelayService;
use photodrop_scheduler::TokioTimer;

#[derive(Parser)]
#[command(name = "photodrop")]
#[command(about = "Relay photos and documents from Telegram senders to one recipient")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot and the liveness server (default)
    Serve {
        /// Port for the liveness server, overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query the liveness endpoint of a running instance
    Status {
        /// Port to query, defaults to PORT or 3000
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let mut config = photodrop_config::from_env().context("Failed to load configuration")?;
            if let Some(port) = port {
                config.port = port;
            }

            photodrop_logging::init_logger(&config.log_level, config.log_dir.as_deref());
            let config = photodrop_config::prepare(config).context("Invalid configuration")?;

            run_server(config).await?;
        }
        Commands::Status { port } => {
            let port = port
                .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
                .unwrap_or(DEFAULT_PORT);
            let client = reqwest::Client::new();
            match client.get(format!("http://localhost:{port}/")).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await?;
                    println!("{status}: {}", body.trim_end());
                }
                Err(_) => {
                    println!("photodrop is not running on port {port}");
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: RelayConfig) -> Result<()> {
    info!(config = %config.redacted(), "Starting photodrop");

    let adapter = Arc::new(TelegramAdapter::new(config.bot_token.clone()));
    let mut bus = RelayBus::new();

    let relay = RelayService::new(
        adapter.clone(),
        RecipientId(config.user_id),
        Arc::new(TokioTimer::new()),
    );
    let inbound_rx = bus
        .take_inbound_rx()
        .context("inbound receiver already taken")?;

    tokio::spawn(async move {
        if let Err(e) = relay.start(inbound_rx).await {
            error!(error = %e, "Relay task failed");
        }
    });

    let addr = config.listen_addr();
    tokio::spawn(async move {
        if let Err(e) = photodrop_gateway::start_server(&addr).await {
            error!(error = %e, addr = %addr, "Liveness server failed");
        }
    });

    info!(recipient = config.user_id, "Bot initialization complete");

    // Runs until Ctrl-C.
    adapter.start(bus.inbound_tx.clone()).await?;

    info!("Shutting down");
    Ok(())
}
