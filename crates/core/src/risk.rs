//! Risk correlation: folds the four evidence streams into one tier per artifact.

use crate::abi::AbiSurfaceMarks;
use crate::evidence::BytecodeEvidence;
use serde::Serialize;
use std::fmt;

/// Per-artifact risk tier, ordered from least to most concerning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Tier {
    Low,
    Medium,
    LikelyReachable,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Low => "LOW",
            Tier::Medium => "MEDIUM",
            Tier::LikelyReachable => "LIKELY-REACHABLE",
        };
        f.write_str(label)
    }
}

/// Deterministic decision table, evaluated top-down, first match wins.
///
/// Reachable bytecode evidence alone is necessary but not sufficient for the top tier:
/// it must pair with an attacker-reachable call surface (forwarder-shaped function or
/// fallback/receive) and at least one corroborating signal (source text or import-graph
/// hit). A forwarder-shaped ABI without corroboration is demoted to MEDIUM, and a
/// source hit alone (no forwarder mark) also only reaches MEDIUM.
pub fn classify(
    evidence: &BytecodeEvidence,
    marks: &AbiSurfaceMarks,
    source_hit: bool,
    import_hits: &[String],
) -> Tier {
    let corroborated = source_hit || !import_hits.is_empty();
    let call_surface = marks.has_forwarder_like_function || marks.has_fallback_or_receive;

    if evidence.runtime_has_delegate_stripped && call_surface && corroborated {
        return Tier::LikelyReachable;
    }
    if evidence.runtime_has_delegate_stripped
        && (marks.has_forwarder_like_function || corroborated)
    {
        return Tier::Medium;
    }
    Tier::Low
}
