use clap::Parser;

mod app;
mod chat;
mod cli;
mod conversation;
mod logging;
mod output;
mod relay_client;

use crate::chat::ChatSession;
use crate::cli::Args;
use crate::logging::log_error;
use crate::relay_client::RelayClient;

/// Main function - Talks to the relay daemon on behalf of the terminal user
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (NEURA_RELAY_URL, RUST_LOG)
    dotenvy::dotenv().ok();

    let args = Args::parse();
    logging::init(args.verbose);

    let relay = RelayClient::new(&args.relay_url);
    let mut session = ChatSession::new(args.send_history);

    let result = match args.prompt {
        Some(prompt) => app::run_single_query(prompt, &mut session, &relay).await,
        None => app::run_interactive_chat(&mut session, &relay).await,
    };

    if let Err(e) = &result {
        log_error(&format!("{:#}", e));
    }
    result
}
