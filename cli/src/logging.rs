use colored::*;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// Quiet by default so log lines do not interleave with the chat; `--verbose`
/// or `RUST_LOG` turns them on.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn log_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}
