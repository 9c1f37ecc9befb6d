use clap::Parser;
use f4scan_cli::commands::{Cmd, Command};

/// f4scan CLI
///
/// f4scan is a static bytecode risk classifier: it scans compiled-contract build
/// artifacts for DELEGATECALL opcodes that survive outside the compiler metadata
/// tail, correlates the bytecode evidence with ABI-surface and source-pattern
/// heuristics, and reports a per-artifact risk tier.
#[derive(Parser)]
#[command(name = "f4scan")]
#[command(about = "f4scan: DELEGATECALL reachability scanner for build artifacts")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

/// Runs the f4scan CLI with the provided arguments.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.command.debug() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute().await
}
