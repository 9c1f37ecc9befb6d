//! Bytecode evidence extraction: which sides of an artifact carry a DELEGATECALL,
//! and does it survive metadata stripping?
//!
//! Each present bytecode side gets two independent disassembler calls (stripped and
//! full). Any failure along the way, including a hex field that does not decode,
//! degrades to "no evidence" for that boolean; nothing here aborts a scan.

use crate::artifact::Artifact;
use crate::disasm::{Disassemble, contains_delegatecall};
use crate::metadata::{normalize_hex, strip_metadata};
use serde::Serialize;

/// Derived bytecode evidence for one artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BytecodeEvidence {
    /// DELEGATECALL present in the metadata-stripped runtime bytecode.
    pub runtime_has_delegate_stripped: bool,
    /// DELEGATECALL present in the metadata-stripped creation bytecode.
    pub creation_has_delegate_stripped: bool,
    /// DELEGATECALL present anywhere in the unstripped runtime bytecode.
    pub runtime_has_delegate_full: bool,
    /// DELEGATECALL present anywhere in the unstripped creation bytecode.
    pub creation_has_delegate_full: bool,
    /// A delegatecall appears in the full bytecode but not the stripped bytecode,
    /// for either side: the only occurrence sits in the unreachable metadata tail.
    pub metadata_only: bool,
}

impl BytecodeEvidence {
    /// True when either side has a hit that survives metadata stripping.
    pub fn has_stripped_hit(&self) -> bool {
        self.runtime_has_delegate_stripped || self.creation_has_delegate_stripped
    }
}

/// Evaluates both bytecode sides of an artifact against the disassembler.
pub async fn evaluate(artifact: &Artifact, disasm: &dyn Disassemble) -> BytecodeEvidence {
    let (creation_stripped, creation_full) =
        scan_side(artifact.creation_bytecode.as_deref(), disasm).await;
    let (runtime_stripped, runtime_full) =
        scan_side(artifact.runtime_bytecode.as_deref(), disasm).await;

    BytecodeEvidence {
        runtime_has_delegate_stripped: runtime_stripped,
        creation_has_delegate_stripped: creation_stripped,
        runtime_has_delegate_full: runtime_full,
        creation_has_delegate_full: creation_full,
        metadata_only: (runtime_full && !runtime_stripped)
            || (creation_full && !creation_stripped),
    }
}

/// Returns (stripped hit, full hit) for one bytecode field.
async fn scan_side(raw: Option<&str>, disasm: &dyn Disassemble) -> (bool, bool) {
    let Some(raw) = raw else {
        return (false, false);
    };
    if normalize_hex(raw).is_empty() {
        return (false, false);
    }

    let stripped = scan_hex(strip_metadata(raw), disasm).await;
    let full = scan_hex(normalize_hex(raw), disasm).await;
    (stripped, full)
}

async fn scan_hex(hexstr: &str, disasm: &dyn Disassemble) -> bool {
    if hexstr.is_empty() {
        return false;
    }
    let bytes = match hex::decode(hexstr.to_ascii_lowercase()) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!("undecodable bytecode field, counting as no evidence: {err}");
            return false;
        }
    };
    match disasm.disassemble(&bytes).await {
        Ok(lines) => contains_delegatecall(&lines),
        Err(err) => {
            tracing::debug!("disassembly failed, counting as no evidence: {err}");
            false
        }
    }
}
