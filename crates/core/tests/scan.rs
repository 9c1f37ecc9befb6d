//! Pipeline tests over on-disk artifact fixtures with canned disassembler adapters.

use async_trait::async_trait;
use f4scan_core::artifact::Artifact;
use f4scan_core::disasm::Disassemble;
use f4scan_core::evidence;
use f4scan_core::result::{Error, Result};
use f4scan_core::risk::Tier;
use f4scan_core::scan::{EmitMode, RiskRecord, scan_artifacts};
use f4scan_core::source_scan::SourceScanner;
use serde_json::json;
use std::fs;
use std::path::Path;

/// CBOR/IPFS metadata marker as hex text, for building synthetic bytecode.
const MARKER: &str = "a2646970667358";

/// Canned adapter: maps each byte to a mnemonic line, `0xf4` to DELEGATECALL.
///
/// Good enough for evidence tests: a DELEGATECALL token appears in the output iff the
/// input bytes contain 0xf4, so stripping the metadata tail removes exactly the hits
/// that live there.
struct ByteMnemonicDisassembler;

#[async_trait]
impl Disassemble for ByteMnemonicDisassembler {
    async fn disassemble(&self, bytes: &[u8]) -> Result<Vec<String>> {
        if bytes.is_empty() {
            return Err(Error::EmptyDisassembly);
        }
        Ok(bytes
            .iter()
            .enumerate()
            .map(|(pc, byte)| {
                let mnemonic = match byte {
                    0x00 => "STOP",
                    0xf4 => "DELEGATECALL",
                    _ => "DUP1",
                };
                format!("{pc:06x} {mnemonic}")
            })
            .collect())
    }
}

/// Adapter that always fails, for skip-and-continue coverage.
struct BrokenDisassembler;

#[async_trait]
impl Disassemble for BrokenDisassembler {
    async fn disassemble(&self, _bytes: &[u8]) -> Result<Vec<String>> {
        Err(Error::Heimdall("canned failure".into()))
    }
}

fn artifact_with_runtime(runtime: &str) -> Artifact {
    Artifact {
        contract_name: "Fixture".into(),
        runtime_bytecode: Some(runtime.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn metadata_only_hit_is_inferred_not_reachable() {
    // Reachable prefix has no 0xf4; the tail after the marker does.
    let bytecode = format!("0x60016002{MARKER}1220f4f4");
    let evidence =
        evidence::evaluate(&artifact_with_runtime(&bytecode), &ByteMnemonicDisassembler).await;

    assert!(!evidence.runtime_has_delegate_stripped);
    assert!(evidence.runtime_has_delegate_full);
    assert!(evidence.metadata_only);
    assert!(!evidence.has_stripped_hit());
}

#[tokio::test]
async fn reachable_hit_is_not_metadata_only() {
    let bytecode = format!("0x6001f4{MARKER}1220aabb");
    let evidence =
        evidence::evaluate(&artifact_with_runtime(&bytecode), &ByteMnemonicDisassembler).await;

    assert!(evidence.runtime_has_delegate_stripped);
    assert!(evidence.runtime_has_delegate_full);
    assert!(!evidence.metadata_only);
}

#[tokio::test]
async fn empty_and_absent_bytecode_fields_yield_all_false() {
    let artifact = artifact_with_runtime("0x");
    let evidence = evidence::evaluate(&artifact, &ByteMnemonicDisassembler).await;
    assert_eq!(evidence, Default::default());

    let tier = f4scan_core::risk::classify(
        &evidence,
        &f4scan_core::abi::analyze(&artifact.abi),
        false,
        &[],
    );
    assert_eq!(tier, Tier::Low);
}

#[tokio::test]
async fn disassembler_failure_degrades_to_no_evidence() {
    let bytecode = format!("0x6001f4{MARKER}1220aabb");
    let evidence =
        evidence::evaluate(&artifact_with_runtime(&bytecode), &BrokenDisassembler).await;
    assert_eq!(evidence, Default::default());
}

fn write_artifact(root: &Path, dir: &str, name: &str, value: &serde_json::Value) {
    let artifact_dir = root.join("out").join(dir);
    fs::create_dir_all(&artifact_dir).expect("mkdirs");
    fs::write(
        artifact_dir.join(format!("{name}.json")),
        serde_json::to_string_pretty(value).expect("serialize fixture"),
    )
    .expect("write artifact");
}

/// Builds a project tree with three artifacts whose tiers span the whole range.
fn build_fixture_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    fs::create_dir_all(root.join("src")).expect("mkdirs");
    fs::create_dir_all(root.join("lib")).expect("mkdirs");
    fs::write(
        root.join("src/Proxy.sol"),
        "contract Proxy { function upgradeTo(address impl) external {} }",
    )
    .expect("write source");
    fs::write(
        root.join("src/Plain.sol"),
        "contract Plain { function ping() external {} }",
    )
    .expect("write source");
    fs::write(
        root.join("lib/Address.sol"),
        "library Address { function f(address t, bytes memory d) internal { t.delegatecall(d); } }",
    )
    .expect("write source");

    let delegating_runtime = format!("0x6001f4{MARKER}1220aabb");
    let plain_runtime = format!("0x60016002{MARKER}1220aabb");

    // Scenario A: reachable hit + upgradeTo(address) surface + import corroboration.
    write_artifact(
        root,
        "Proxy.sol",
        "Proxy",
        &json!({
            "abi": [{
                "type": "function",
                "name": "upgradeTo",
                "stateMutability": "nonpayable",
                "inputs": [{"type": "address"}]
            }],
            "bytecode": {"object": "0x6000"},
            "deployedBytecode": {"object": delegating_runtime},
            "metadata": {
                "settings": {"compilationTarget": {"src/Proxy.sol": "Proxy"}},
                "sources": {"src/Proxy.sol": {}, "lib/Address.sol": {}}
            }
        }),
    );

    // Scenario B: same bytecode and corroboration, but no call surface in the ABI.
    write_artifact(
        root,
        "Relay.sol",
        "Relay",
        &json!({
            "abi": [{
                "type": "function",
                "name": "poke",
                "stateMutability": "nonpayable",
                "inputs": [{"type": "uint256"}]
            }],
            "deployedBytecode": {"object": delegating_runtime},
            "metadata": {
                "settings": {"compilationTarget": {"src/Proxy.sol": "Relay"}},
                "sources": {"src/Proxy.sol": {}, "lib/Address.sol": {}}
            }
        }),
    );

    // No reachable hit at all.
    write_artifact(
        root,
        "Plain.sol",
        "Plain",
        &json!({
            "abi": [{"type": "fallback", "stateMutability": "payable"}],
            "deployedBytecode": {"object": plain_runtime},
            "metadata": {
                "settings": {"compilationTarget": {"src/Plain.sol": "Plain"}},
                "sources": {"src/Plain.sol": {}}
            }
        }),
    );

    // Not an artifact: valid JSON with neither ABI nor bytecode; must be skipped.
    fs::write(
        root.join("out").join("build-info.json"),
        r#"{"solcVersion": "0.8.24"}"#,
    )
    .expect("write non-artifact");

    dir
}

fn by_name<'a>(records: &'a [RiskRecord], name: &str) -> &'a RiskRecord {
    records
        .iter()
        .find(|record| record.contract_name == name)
        .unwrap_or_else(|| panic!("no record for {name}"))
}

#[tokio::test]
async fn end_to_end_scan_classifies_and_counts() {
    let project = build_fixture_project();
    let root = project.path();
    let scanner = SourceScanner::new(root);

    let (records, summary) =
        scan_artifacts(&root.join("out"), &ByteMnemonicDisassembler, &scanner).await;

    assert_eq!(summary.scanned, 3, "build-info.json must not count");
    assert_eq!(summary.with_deployed, 3);
    assert_eq!(summary.printed, 0, "pipeline itself prints nothing");
    assert_eq!(records.len(), 3);

    let proxy = by_name(&records, "Proxy");
    assert_eq!(proxy.tier, Tier::LikelyReachable);
    assert!(proxy.evidence.runtime_has_delegate_stripped);
    assert!(!proxy.source_hit, "Proxy.sol itself has no delegatecall text");
    assert_eq!(proxy.import_hits, vec!["lib/Address.sol"]);
    assert_eq!(proxy.source_path.as_deref(), Some("src/Proxy.sol"));

    // Scenario B: corroborated but no call surface; rule 2 yields MEDIUM, not LOW.
    let relay = by_name(&records, "Relay");
    assert_eq!(relay.tier, Tier::Medium);
    assert!(!relay.abi_marks.has_forwarder_like_function);
    assert!(!relay.abi_marks.has_fallback_or_receive);

    let plain = by_name(&records, "Plain");
    assert_eq!(plain.tier, Tier::Low);
    assert!(!plain.evidence.has_stripped_hit());
}

#[tokio::test]
async fn mode_filtering_selects_the_expected_records() {
    let project = build_fixture_project();
    let root = project.path();
    let scanner = SourceScanner::new(root);

    let (records, _) =
        scan_artifacts(&root.join("out"), &ByteMnemonicDisassembler, &scanner).await;

    let kept = |mode: EmitMode| -> Vec<&str> {
        records
            .iter()
            .filter(|record| mode.keeps(record))
            .map(|record| record.contract_name.as_str())
            .collect()
    };

    let mut all = kept(EmitMode::All);
    all.sort_unstable();
    assert_eq!(all, vec!["Plain", "Proxy", "Relay"]);

    let mut only_deleg = kept(EmitMode::OnlyDeleg);
    only_deleg.sort_unstable();
    assert_eq!(only_deleg, vec!["Proxy", "Relay"]);

    assert_eq!(kept(EmitMode::Strict), vec!["Proxy"]);
}

#[tokio::test]
async fn broken_disassembler_still_completes_the_scan() {
    let project = build_fixture_project();
    let root = project.path();
    let scanner = SourceScanner::new(root);

    let (records, summary) =
        scan_artifacts(&root.join("out"), &BrokenDisassembler, &scanner).await;

    assert_eq!(summary.scanned, 3);
    assert_eq!(records.len(), 3);
    for record in &records {
        assert!(!record.evidence.has_stripped_hit());
        // Without runtime evidence no rule past LOW can fire.
        assert_eq!(record.tier, Tier::Low);
    }
}
