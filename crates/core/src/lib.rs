//! f4scan core: a static DELEGATECALL risk classifier for compiled-contract
//! build artifacts.
//!
//! Given a directory of build artifacts, the pipeline determines per artifact whether
//! the 0xf4 opcode survives in reachable (post-compile, pre-metadata) bytecode versus
//! only in the compiler metadata tail, correlates that with ABI-surface heuristics and
//! source-pattern hints, and emits a risk tier. "Reachable" is syntactic (outside the
//! metadata suffix), not a control-flow notion.

pub mod abi;
pub mod artifact;
pub mod disasm;
pub mod evidence;
pub mod metadata;
pub mod result;
pub mod risk;
pub mod scan;
pub mod source_scan;

pub use abi::{AbiSurfaceMarks, analyze};
pub use artifact::{Artifact, find_artifact, locate_artifacts, read_artifact};
pub use disasm::{Disassemble, HeimdallDisassembler, contains_delegatecall, probe};
pub use evidence::BytecodeEvidence;
pub use metadata::{normalize_hex, strip_metadata};
pub use result::{Error, Result};
pub use risk::{Tier, classify};
pub use scan::{EmitMode, RiskRecord, ScanSummary, scan_artifacts};
pub use source_scan::SourceScanner;
