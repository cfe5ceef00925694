use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

use crate::chat::{ChatSession, SubmitRejected};
use crate::output::{print_message, print_session_banner, EXIT_COMMANDS};
use crate::relay_client::{RelayClient, RelayTransport};

/// Reserved words that end the session instead of being sent
fn is_exit_command(text: &str) -> bool {
    let text = text.trim();
    EXIT_COMMANDS
        .iter()
        .any(|command| text.eq_ignore_ascii_case(command))
}

/// Spinner shown while a reply is pending
fn typing_indicator() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message("Neura is typing...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

/// Sends one message and prints the reply (or the apology)
pub async fn run_single_query(
    prompt: String,
    session: &mut ChatSession,
    relay: &RelayClient,
) -> Result<()> {
    info!("Running single query");

    let spinner = typing_indicator()?;
    let result = session.submit(&prompt, relay).await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) => print_message(reply),
        Err(SubmitRejected::Empty) => println!("Nothing to send."),
        Err(e @ SubmitRejected::Busy) => return Err(e.into()),
    }

    Ok(())
}

/// Runs an interactive chat session against the relay
pub async fn run_interactive_chat(session: &mut ChatSession, relay: &RelayClient) -> Result<()> {
    print_session_banner(relay.endpoint());
    for message in session.conversation().messages() {
        print_message(message);
    }

    loop {
        // Prompt for user input
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            println!();
            break;
        }

        let text = input.trim_end_matches(['\r', '\n']);

        if is_exit_command(text) {
            println!("Exiting chat session.");
            break;
        }

        let turn = match session.begin(text) {
            Ok(turn) => turn,
            Err(SubmitRejected::Empty) => continue,
            Err(e) => {
                debug!(error = %e, "Submission ignored");
                continue;
            }
        };

        // Input stays blocked on this await, so only one turn is ever in flight
        let spinner = typing_indicator()?;
        let outcome = relay.send(turn.request()).await;
        spinner.finish_and_clear();

        print_message(session.complete(turn, outcome));
        println!(); // Add spacing between interactions
    }

    Ok(())
}
