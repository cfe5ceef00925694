use clap::Parser;
use neura_core::client::GeminiClient;
use neura_core::config::GeminiConfig;
use neura_relay::config::RelayConfig;
use neura_relay::http_server::{self, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "relay-daemon", about = "Chat relay between Neura clients and Gemini")]
struct Args {
    /// Path to config file (defaults to ~/.config/neura/relay.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// HTTP server address
    #[arg(long)]
    http_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up GEMINI_API_KEY from .env before clap reads the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting relay daemon");

    let args = Args::parse();

    // Load config from file or use defaults
    let config_path = RelayConfig::resolve_path(args.config.as_deref())?;
    let mut config = match RelayConfig::load_from_file(&config_path) {
        Ok(cfg) => {
            info!("Loaded configuration from {}", config_path.display());
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration from {}: {}", config_path.display(), e);
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };

    // Update config from CLI args
    config.gemini = config
        .gemini
        .merge(&GeminiConfig::new(args.api_key, args.model));
    if let Some(addr) = args.http_addr {
        config.http_addr = addr;
    }

    // A missing credential is fatal here rather than at the first request
    let gemini_client = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => {
            info!(model = client.model_name(), "Initialized Gemini client");
            client
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Gemini client");
            return Err(anyhow::anyhow!(
                "Failed to initialize Gemini client: {}. Set GEMINI_API_KEY or pass --api-key.",
                e
            ));
        }
    };

    let state = AppState::new(config.persona, Arc::new(gemini_client));
    http_server::run_server(state, config.http_addr).await?;

    info!("Relay daemon shutting down");
    Ok(())
}
