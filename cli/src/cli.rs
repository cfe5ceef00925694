use clap::Parser;

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8080";

/// Terminal chat client for the Neura relay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Send a single message and print the reply; without it an interactive session starts
    #[arg(index = 1)] // Positional argument
    pub prompt: Option<String>,

    /// Base URL of the relay daemon
    #[arg(long, env = "NEURA_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub relay_url: String,

    /// Send earlier turns with each message so the model keeps context
    #[arg(long, default_value_t = false)]
    pub send_history: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
