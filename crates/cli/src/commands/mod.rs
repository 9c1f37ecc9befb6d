use async_trait::async_trait;
use clap::Subcommand;
use std::error::Error;

pub mod inspect;
pub mod scan;

/// Exit status when a required external collaborator (the disassembler) is unavailable.
pub const EXIT_COLLABORATOR_UNAVAILABLE: i32 = 127;

/// CLI subcommands for f4scan.
#[derive(Subcommand)]
pub enum Cmd {
    /// Scan a directory of build artifacts and report per-artifact risk tiers.
    Scan(scan::ScanArgs),
    /// Inspect a single contract's disassembly for DELEGATECALL occurrences.
    Inspect(inspect::InspectArgs),
}

impl Cmd {
    /// Whether diagnostic trace output was requested.
    pub fn debug(&self) -> bool {
        match self {
            Cmd::Scan(args) => args.debug,
            Cmd::Inspect(args) => args.debug,
        }
    }
}

/// Trait for executing CLI subcommands.
#[async_trait]
pub trait Command {
    /// Executes the subcommand.
    ///
    /// # Returns
    /// A `Result` indicating success or an error if execution fails.
    async fn execute(self) -> Result<(), Box<dyn Error>>;
}

#[async_trait]
impl Command for Cmd {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Scan(args) => args.execute().await,
            Cmd::Inspect(args) => args.execute().await,
        }
    }
}
