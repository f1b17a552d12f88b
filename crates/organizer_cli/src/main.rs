use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use organizer_cli::cli::Cli;
use organizer_cli::commands;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging. Command output goes to stdout, logs to stderr.
    let filter = EnvFilter::from_env("ORGANIZER_LOG");
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    if let Err(e) = commands::execute(&cli).await {
        error!("Error: {e}");
        std::process::exit(1);
    }
}
