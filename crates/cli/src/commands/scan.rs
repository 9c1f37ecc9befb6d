//! The directory-scanning mode: walks an artifact root, classifies every candidate,
//! and renders a fixed-width table with a running summary and a column legend.

use async_trait::async_trait;
use clap::Args;
use f4scan_core::disasm::{HeimdallDisassembler, probe};
use f4scan_core::scan::{EmitMode, RiskRecord, scan_artifacts};
use f4scan_core::source_scan::SourceScanner;
use std::error::Error;
use std::path::Path;

/// Arguments for the `scan` subcommand.
#[derive(Args)]
pub struct ScanArgs {
    /// Artifact root directory to scan.
    #[arg(default_value = "out")]
    pub root: String,
    /// Emit a record for every artifact regardless of evidence.
    #[arg(long, conflicts_with = "strict")]
    pub all: bool,
    /// Emit only artifacts with at least one stripped-bytecode DELEGATECALL hit.
    ///
    /// This is the default; the flag exists so the default mode can be spelled out
    /// explicitly, and to reject contradictory combinations with --all.
    #[arg(long, conflicts_with = "all")]
    pub only_deleg: bool,
    /// Implies --only-deleg; additionally suppress everything but LIKELY-REACHABLE.
    #[arg(long)]
    pub strict: bool,
    /// Emit diagnostic trace lines to stderr.
    #[arg(long)]
    pub debug: bool,
    /// Project root used to resolve and search source files.
    #[arg(long, default_value = ".")]
    pub project_root: String,
}

impl ScanArgs {
    fn mode(&self) -> EmitMode {
        if self.strict {
            EmitMode::Strict
        } else if self.all {
            EmitMode::All
        } else {
            EmitMode::OnlyDeleg
        }
    }
}

/// Executes the `scan` subcommand over an artifact root.
#[async_trait]
impl super::Command for ScanArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let disasm = HeimdallDisassembler;
        if !probe(&disasm).await {
            eprintln!("f4scan: disassembler unavailable, cannot gather bytecode evidence");
            std::process::exit(super::EXIT_COLLABORATOR_UNAVAILABLE);
        }

        let scanner = SourceScanner::new(&self.project_root);
        let (records, mut summary) =
            scan_artifacts(Path::new(&self.root), &disasm, &scanner).await;

        let mode = self.mode();
        println!("Artifact root: {}", self.root);
        println!("{}", header_row());
        for record in records.iter().filter(|record| mode.keeps(record)) {
            println!("{}", render_row(record));
            if !record.import_hits.is_empty() {
                println!("FROM_IMPORTS[{}]", record.import_hits.join(","));
            }
            summary.printed += 1;
        }

        println!();
        println!(
            "scanned={} artifacts, with_deployed={}, printed={}",
            summary.scanned, summary.with_deployed, summary.printed
        );
        print_legend();
        Ok(())
    }
}

fn yn(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn header_row() -> String {
    format!(
        "{:<12}{:<13}{:<11}{:<9}{:<10}{:<11}{:<18}{:<40}{}",
        "RUNTIME_F4",
        "CREATION_F4",
        "META_ONLY",
        "ABI_FWD",
        "ABI_FALL",
        "SRC_DELEG",
        "RISK_HINT",
        "SOURCE_PATH",
        "CONTRACT"
    )
}

fn render_row(record: &RiskRecord) -> String {
    format!(
        "{:<12}{:<13}{:<11}{:<9}{:<10}{:<11}{:<18}{:<40}{}",
        yn(record.evidence.runtime_has_delegate_stripped),
        yn(record.evidence.creation_has_delegate_stripped),
        yn(record.evidence.metadata_only),
        yn(record.abi_marks.has_forwarder_like_function),
        yn(record.abi_marks.has_fallback_or_receive),
        yn(record.source_hit),
        record.tier.to_string(),
        record.source_path.as_deref().unwrap_or("-"),
        record.contract_name
    )
}

fn print_legend() {
    println!();
    println!("Legend:");
    println!("  RUNTIME_F4   DELEGATECALL present in metadata-stripped runtime bytecode");
    println!("  CREATION_F4  DELEGATECALL present in metadata-stripped creation bytecode");
    println!("  META_ONLY    DELEGATECALL only in the unreachable compiler metadata tail");
    println!("  ABI_FWD      ABI declares an upgrade/forwarder-shaped mutating function");
    println!("  ABI_FALL     ABI declares a fallback or receive entry");
    println!("  SRC_DELEG    primary source file matches a textual delegatecall idiom");
    println!("  RISK_HINT    correlated tier: LOW, MEDIUM, or LIKELY-REACHABLE");
    println!("  SOURCE_PATH  declared primary source file of the artifact");
    println!("  CONTRACT     contract name");
}
