//! Single-artifact companion mode: disassemble one contract and show where the
//! DELEGATECALL occurrences sit, distinguishing reachable code from the metadata tail.

use async_trait::async_trait;
use clap::Args;
use f4scan_core::artifact::{find_artifact, read_artifact};
use f4scan_core::disasm::{Disassemble, HeimdallDisassembler, delegatecall_lines, probe};
use f4scan_core::metadata::{normalize_hex, strip_metadata};
use std::error::Error;
use std::path::Path;

/// Arguments for the `inspect` subcommand.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the contract's Solidity source file (used to locate the artifact).
    pub solidity_path: String,
    /// Contract name within that source file.
    pub contract_name: String,
    /// Artifact root directory.
    #[arg(long, default_value = "out")]
    pub root: String,
    /// Print N lines of disassembly context around each match instead of just
    /// match line numbers.
    #[arg(long, value_name = "N")]
    pub show: Option<usize>,
    /// Emit diagnostic trace lines to stderr.
    #[arg(long)]
    pub debug: bool,
}

/// Executes the `inspect` subcommand for one contract.
#[async_trait]
impl super::Command for InspectArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let disasm = HeimdallDisassembler;
        if !probe(&disasm).await {
            eprintln!("f4scan: disassembler unavailable, cannot gather bytecode evidence");
            std::process::exit(super::EXIT_COLLABORATOR_UNAVAILABLE);
        }

        let artifact_path =
            find_artifact(Path::new(&self.root), &self.solidity_path, &self.contract_name)?;
        let artifact = read_artifact(&artifact_path)?;

        // Runtime bytecode is what a deployed contract executes; creation code is only
        // a fallback for artifacts that never record a deployed blob.
        let raw = artifact
            .runtime_bytecode
            .as_deref()
            .filter(|raw| !normalize_hex(raw).is_empty())
            .or(artifact.creation_bytecode.as_deref())
            .unwrap_or("");
        if normalize_hex(raw).is_empty() {
            println!("DELEGATECALL count (reachable): 0");
            println!("note: artifact carries no bytecode to inspect");
            return Ok(());
        }

        let stripped_lines = disassemble_hex(&disasm, strip_metadata(raw)).await?;
        let full_lines = disassemble_hex(&disasm, normalize_hex(raw)).await?;

        let reachable = delegatecall_lines(&stripped_lines);
        let full = delegatecall_lines(&full_lines);

        match self.show {
            Some(context) => print_context(&stripped_lines, &reachable, context),
            None => {
                for index in &reachable {
                    println!("match at line {}: {}", index + 1, stripped_lines[*index]);
                }
            }
        }

        println!("DELEGATECALL count (reachable): {}", reachable.len());
        if reachable.is_empty() && !full.is_empty() {
            println!(
                "note: the only DELEGATECALL occurrence is in the unreachable metadata tail"
            );
        }
        Ok(())
    }
}

async fn disassemble_hex(
    disasm: &dyn Disassemble,
    hexstr: &str,
) -> f4scan_core::Result<Vec<String>> {
    if hexstr.is_empty() {
        return Ok(Vec::new());
    }
    let bytes = hex::decode(hexstr.to_ascii_lowercase())?;
    disasm.disassemble(&bytes).await
}

fn print_context(lines: &[String], matches: &[usize], context: usize) {
    for (nth, index) in matches.iter().enumerate() {
        if nth > 0 {
            println!("--");
        }
        let start = index.saturating_sub(context);
        let end = (index + context + 1).min(lines.len());
        for (offset, line) in lines[start..end].iter().enumerate() {
            let marker = if start + offset == *index { ">" } else { " " };
            println!("{marker} {:>6}  {line}", start + offset + 1);
        }
    }
}
