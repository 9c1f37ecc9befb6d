//! ABI surface heuristics: does the declared interface expose a way to reach a
//! delegatecall from the outside?
//!
//! Two independent signals are OR-combined over the whole ABI: a curated list of
//! upgrade/forwarding-style function names, and the `(target, data)` parameter shape
//! that forwarders tend to have even when the name gives no hint. Entries with missing
//! fields are treated as neutral, never as errors.

use serde::Serialize;
use serde_json::Value;

/// Upgrade/forwarding-style function names, matched case-sensitively and exactly.
///
/// Versioned rule table: extend here, not in the matching code.
pub const FORWARDER_NAMES: &[&str] = &[
    "delegateCall",
    "delegatecall",
    "execute",
    "executeCall",
    "forward",
    "forwardCall",
    "implementation",
    "multicallDelegate",
    "setImplementation",
    "setTarget",
    "upgrade",
    "upgradeImplementation",
    "upgradeTo",
    "upgradeToAndCall",
];

/// Exact comma-joined parameter-type signatures that match the forwarding shape
/// on their own, without requiring an `address`/`bytes` pair.
pub const FORWARDER_SHAPES: &[&str] = &["address", "bytes", "bytes,bytes"];

/// Derived once per artifact from its ABI entries; immutable afterward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AbiSurfaceMarks {
    /// Some state-changing function looks like an upgrade/forwarding entry point.
    pub has_forwarder_like_function: bool,
    /// The contract declares a fallback or receive entry.
    pub has_fallback_or_receive: bool,
}

/// Computes the ABI surface marks for one artifact.
///
/// A single matching entry is sufficient for either mark. `pure`/`view` functions are
/// skipped since they can neither change state nor move value; a missing
/// `stateMutability` is treated as mutating.
pub fn analyze(abi: &[Value]) -> AbiSurfaceMarks {
    let mut marks = AbiSurfaceMarks::default();

    for entry in abi {
        let kind = entry.get("type").and_then(Value::as_str).unwrap_or("");
        match kind {
            "fallback" | "receive" => marks.has_fallback_or_receive = true,
            "function" => {
                let mutability = entry
                    .get("stateMutability")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                if mutability == "pure" || mutability == "view" {
                    continue;
                }

                let name = entry.get("name").and_then(Value::as_str).unwrap_or("");
                if FORWARDER_NAMES.contains(&name) {
                    marks.has_forwarder_like_function = true;
                }
                if has_forwarder_shape(entry) {
                    marks.has_forwarder_like_function = true;
                }
            }
            _ => {}
        }
    }

    marks
}

/// Checks the parameter-type signature against the forwarding shape rules.
fn has_forwarder_shape(entry: &Value) -> bool {
    let types: Vec<&str> = entry
        .get("inputs")
        .and_then(Value::as_array)
        .map(|inputs| {
            inputs
                .iter()
                .map(|input| input.get("type").and_then(Value::as_str).unwrap_or(""))
                .collect()
        })
        .unwrap_or_default();

    let address_and_bytes =
        types.iter().any(|t| *t == "address") && types.iter().any(|t| *t == "bytes");

    address_and_bytes || FORWARDER_SHAPES.contains(&types.join(",").as_str())
}
