use crate::conversation::{Message, Role};
use colored::*;

/// Lines that end an interactive session; they are never sent to the relay
pub const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// Label printed in front of a message
pub fn speaker_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Neura",
    }
}

/// Print one conversation message to the terminal
pub fn print_message(message: &Message) {
    let label = speaker_label(message.role());
    let label = match message.role() {
        Role::User => label.green().bold(),
        Role::Assistant if message.is_apology() => label.red().bold(),
        Role::Assistant => label.blue().bold(),
    };

    println!("{}: {}", label, message.content());
}

/// Show usage hints at the start of an interactive session
pub fn print_session_banner(relay_endpoint: &str) {
    println!("{}", "Neura - Your AI Therapist for meaningful conversations".green().bold());
    println!("{} {}", "Relay:".cyan(), relay_endpoint);
    println!("{}", session_hint());
    println!();
}

fn session_hint() -> String {
    format!(
        "Type '{}' or '{}' on its own line to end the session; these words are reserved and never sent to Neura.",
        EXIT_COMMANDS[0], EXIT_COMMANDS[1]
    )
}
