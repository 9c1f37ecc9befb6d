//! The directory-scan pipeline: locate artifacts, gather evidence, correlate, and
//! hand immutable records plus an explicit summary back to the reporter.
//!
//! Data flows strictly left to right per artifact; no state is shared across
//! artifacts. Summary counters live in an explicit [`ScanSummary`] value rather than
//! ambient process state.

use crate::abi::{self, AbiSurfaceMarks};
use crate::artifact::{locate_artifacts, read_artifact};
use crate::disasm::Disassemble;
use crate::evidence::{self, BytecodeEvidence};
use crate::risk::{Tier, classify};
use crate::source_scan::SourceScanner;
use serde::Serialize;
use std::path::Path;

/// One emitted unit of classification. Created once, never mutated, printed at most once.
#[derive(Debug, Clone, Serialize)]
pub struct RiskRecord {
    /// Display identity: the artifact's declared primary source file, if any.
    pub source_path: Option<String>,
    /// Display identity: the contract name.
    pub contract_name: String,
    pub evidence: BytecodeEvidence,
    pub abi_marks: AbiSurfaceMarks,
    /// The primary source file textually matches a delegatecall idiom.
    pub source_hit: bool,
    /// Imported source files that match, in declaration order, distinct.
    pub import_hits: Vec<String>,
    pub tier: Tier,
}

/// Running totals for one scan. `printed` is filled in by the reporter after
/// mode filtering; the pipeline only counts what it processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Candidate artifacts that were fully processed.
    pub scanned: usize,
    /// Candidates with non-empty deployed (runtime) bytecode.
    pub with_deployed: usize,
    /// Records actually emitted by the reporter.
    pub printed: usize,
}

/// Output filtering mode for the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// Emit a record for every scanned artifact.
    All,
    /// Emit only artifacts with at least one stripped-bytecode DELEGATECALL hit.
    OnlyDeleg,
    /// Emit only LIKELY-REACHABLE records.
    Strict,
}

impl EmitMode {
    /// Whether the reporter keeps this record under the mode's filter.
    pub fn keeps(self, record: &RiskRecord) -> bool {
        match self {
            EmitMode::All => true,
            EmitMode::OnlyDeleg => record.evidence.has_stripped_hit(),
            EmitMode::Strict => record.tier == Tier::LikelyReachable,
        }
    }
}

/// Scans every artifact under `root`, one at a time.
///
/// Per-artifact failures (unreadable file, malformed JSON, disassembly errors, missing
/// sources) are logged at debug level and skipped; the scan always runs to completion.
pub async fn scan_artifacts(
    root: &Path,
    disasm: &dyn Disassemble,
    scanner: &SourceScanner,
) -> (Vec<RiskRecord>, ScanSummary) {
    let mut records = Vec::new();
    let mut summary = ScanSummary::default();

    for path in locate_artifacts(root) {
        let artifact = match read_artifact(&path) {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::debug!("skipping '{}': {err}", path.display());
                continue;
            }
        };
        if !artifact.is_candidate() {
            tracing::debug!(
                "skipping '{}': no bytecode fields at all",
                path.display()
            );
            continue;
        }

        summary.scanned += 1;
        if artifact.has_deployed_bytecode() {
            summary.with_deployed += 1;
        }

        let evidence = evidence::evaluate(&artifact, disasm).await;
        let abi_marks = abi::analyze(&artifact.abi);
        let source_hit = artifact
            .primary_source_path
            .as_deref()
            .is_some_and(|path| scanner.matches(path));
        let import_hits = scanner.import_hits(&artifact.imported_source_paths);
        let tier = classify(&evidence, &abi_marks, source_hit, &import_hits);

        tracing::debug!(
            "classified '{}' ({}): {tier}",
            artifact.contract_name,
            path.display()
        );

        records.push(RiskRecord {
            source_path: artifact.primary_source_path,
            contract_name: artifact.contract_name,
            evidence,
            abi_marks,
            source_hit,
            import_hits,
            tier,
        });
    }

    (records, summary)
}

#[cfg(test)]
mod tests {
    use super::{EmitMode, RiskRecord};
    use crate::abi::AbiSurfaceMarks;
    use crate::evidence::BytecodeEvidence;
    use crate::risk::Tier;

    fn record(tier: Tier, runtime_stripped: bool) -> RiskRecord {
        RiskRecord {
            source_path: None,
            contract_name: "C".into(),
            evidence: BytecodeEvidence {
                runtime_has_delegate_stripped: runtime_stripped,
                ..Default::default()
            },
            abi_marks: AbiSurfaceMarks::default(),
            source_hit: false,
            import_hits: Vec::new(),
            tier,
        }
    }

    #[test]
    fn mode_filtering_matches_the_contract() {
        let low = record(Tier::Low, false);
        let medium = record(Tier::Medium, true);
        let top = record(Tier::LikelyReachable, true);

        assert!(EmitMode::All.keeps(&low));
        assert!(EmitMode::All.keeps(&medium));
        assert!(EmitMode::All.keeps(&top));

        assert!(!EmitMode::OnlyDeleg.keeps(&low));
        assert!(EmitMode::OnlyDeleg.keeps(&medium));
        assert!(EmitMode::OnlyDeleg.keeps(&top));

        assert!(!EmitMode::Strict.keeps(&low));
        assert!(!EmitMode::Strict.keeps(&medium));
        assert!(EmitMode::Strict.keeps(&top));
    }

    #[test]
    fn only_deleg_keeps_creation_side_hits_too() {
        let mut rec = record(Tier::Low, false);
        rec.evidence.creation_has_delegate_stripped = true;
        assert!(EmitMode::OnlyDeleg.keeps(&rec));
    }

    #[test]
    fn records_serialize_with_display_style_tiers() {
        let mut rec = record(Tier::LikelyReachable, true);
        rec.source_path = Some("src/Proxy.sol".into());
        rec.import_hits = vec!["lib/Address.sol".into()];

        let value = serde_json::to_value(&rec).expect("serialize record");
        assert_eq!(value["tier"], "LIKELY-REACHABLE");
        assert_eq!(value["source_path"], "src/Proxy.sol");
        assert_eq!(value["evidence"]["runtime_has_delegate_stripped"], true);
        assert_eq!(value["import_hits"][0], "lib/Address.sol");

        let summary = serde_json::to_value(crate::scan::ScanSummary {
            scanned: 3,
            with_deployed: 2,
            printed: 1,
        })
        .expect("serialize summary");
        assert_eq!(summary["scanned"], 3);
        assert_eq!(summary["printed"], 1);
    }
}
