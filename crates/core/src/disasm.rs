//! Single entry-point for turning byte-sequences into Heimdall mnemonic streams.
//!
//! The scanner never decodes opcodes itself; it only pattern-matches the mnemonic text
//! the disassembler returns. The collaborator sits behind the narrow [`Disassemble`]
//! trait so tests can substitute a canned or failing adapter.

use crate::result::{Error, Result};
use async_trait::async_trait;
use heimdall::{DisassemblerArgsBuilder, disassemble};

/// Narrow disassembler boundary: bytes in, ordered mnemonic lines out.
#[async_trait]
pub trait Disassemble: Send + Sync {
    /// Disassembles raw bytecode into mnemonic instruction lines.
    async fn disassemble(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

/// Production adapter backed by the Heimdall disassembler.
pub struct HeimdallDisassembler;

#[async_trait]
impl Disassemble for HeimdallDisassembler {
    async fn disassemble(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let target = format!("0x{}", hex::encode(bytes));
        let args = DisassemblerArgsBuilder::new()
            .target(target)
            .output("print".into())
            .decimal_counter(false)
            .build()
            .map_err(|e| Error::Heimdall(e.to_string()))?;

        let asm = disassemble(args)
            .await
            .map_err(|e| Error::Heimdall(e.to_string()))?;

        if asm.trim().is_empty() {
            return Err(Error::EmptyDisassembly);
        }
        Ok(asm.lines().map(str::to_string).collect())
    }
}

/// Preflight check that the disassembler collaborator is actually usable.
///
/// Runs the adapter over a trivial single-instruction program. The CLI refuses to start
/// a scan when this fails, since every piece of bytecode evidence depends on it.
pub async fn probe(disasm: &dyn Disassemble) -> bool {
    // 0x00 = STOP
    disasm.disassemble(&[0x00]).await.is_ok()
}

/// True iff any mnemonic line carries the whole-word token `DELEGATECALL`.
pub fn contains_delegatecall(lines: &[String]) -> bool {
    lines.iter().any(|line| line_has_delegatecall(line))
}

/// Zero-based indices of the mnemonic lines carrying a `DELEGATECALL` token.
pub fn delegatecall_lines(lines: &[String]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line_has_delegatecall(line))
        .map(|(index, _)| index)
        .collect()
}

fn line_has_delegatecall(line: &str) -> bool {
    line.split_whitespace()
        .any(|token| token.eq_ignore_ascii_case("DELEGATECALL"))
}
