//! Build-artifact enumeration and tolerant JSON extraction.
//!
//! Artifacts are read once, turned into derived evidence, and discarded; nothing here
//! mutates them. Extraction accepts both foundry-shaped JSON (`bytecode.object`,
//! `metadata.settings.compilationTarget`) and hardhat-shaped JSON (bare `bytecode`
//! string, `sourceName`), treating every missing field as absent rather than failing.

use crate::metadata::normalize_hex;
use crate::result::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One compiled-contract build output, reduced to the fields the scanner consumes.
#[derive(Debug, Clone, Default)]
pub struct Artifact {
    /// Contract name, from the compilation target or the artifact file stem.
    pub contract_name: String,
    /// Creation (constructor) bytecode as a hex string, when present.
    pub creation_bytecode: Option<String>,
    /// Deployed runtime bytecode as a hex string, when present.
    pub runtime_bytecode: Option<String>,
    /// Raw ABI entries; malformed entries are carried as-is and tolerated downstream.
    pub abi: Vec<Value>,
    /// The source file this artifact was compiled from, when recorded.
    pub primary_source_path: Option<String>,
    /// Every other source in the compilation unit, in declaration order.
    pub imported_source_paths: Vec<String>,
}

impl Artifact {
    /// An artifact with no bytecode field at all is not a scan candidate.
    pub fn is_candidate(&self) -> bool {
        self.creation_bytecode.is_some() || self.runtime_bytecode.is_some()
    }

    /// True when the runtime bytecode field is present and non-empty after normalization.
    pub fn has_deployed_bytecode(&self) -> bool {
        self.runtime_bytecode
            .as_deref()
            .is_some_and(|raw| !normalize_hex(raw).is_empty())
    }
}

/// Enumerates candidate artifact files (`*.json`) under `root`, sorted by file name.
pub fn locate_artifacts(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect()
}

/// Reads and extracts a single artifact.
///
/// Fails only on unreadable files, invalid JSON, or JSON that carries neither an ABI
/// nor any bytecode field; the scan loop treats all three as skip-and-continue.
pub fn read_artifact(path: &Path) -> Result<Artifact> {
    let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value =
        serde_json::from_str(&text).map_err(|source| Error::MalformedArtifact {
            path: path.display().to_string(),
            source,
        })?;

    let artifact = extract(&value, path);
    if !artifact.is_candidate() && artifact.abi.is_empty() {
        return Err(Error::NotAnArtifact(path.display().to_string()));
    }
    Ok(artifact)
}

/// Resolves the artifact for a given source file and contract name under `root`.
///
/// Foundry lays artifacts out as `<root>/<file-name>/<Contract>.json`; when that exact
/// path is missing the whole root is searched for a `<Contract>.json`.
pub fn find_artifact(root: &Path, solidity_path: &str, contract: &str) -> Result<PathBuf> {
    let file_name = Path::new(solidity_path)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    let direct = root.join(&file_name).join(format!("{contract}.json"));
    if direct.is_file() {
        return Ok(direct);
    }

    let wanted = format!("{contract}.json");
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == wanted.as_str())
        .map(|entry| entry.into_path())
        .ok_or_else(|| Error::ArtifactNotFound {
            contract: contract.to_string(),
            root: root.display().to_string(),
        })
}

fn extract(value: &Value, path: &Path) -> Artifact {
    let (target_source, target_name) = compilation_target(value);

    let contract_name = target_name
        .or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .unwrap_or_default();

    let primary_source_path = target_source
        .or_else(|| string_field(value, &["sourceName"]))
        .or_else(|| string_field(value, &["ast", "absolutePath"]));

    let mut imported_source_paths = Vec::new();
    if let Some(sources) = value
        .get("metadata")
        .and_then(|m| m.get("sources"))
        .and_then(Value::as_object)
    {
        for key in sources.keys() {
            if Some(key.as_str()) != primary_source_path.as_deref() {
                imported_source_paths.push(key.clone());
            }
        }
    }

    Artifact {
        contract_name,
        creation_bytecode: bytecode_field(value, "bytecode"),
        runtime_bytecode: bytecode_field(value, "deployedBytecode"),
        abi: value
            .get("abi")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        primary_source_path,
        imported_source_paths,
    }
}

/// First entry of `metadata.settings.compilationTarget`, as (source path, contract name).
fn compilation_target(value: &Value) -> (Option<String>, Option<String>) {
    let target = value
        .get("metadata")
        .and_then(|m| m.get("settings"))
        .and_then(|s| s.get("compilationTarget"))
        .and_then(Value::as_object);

    match target.and_then(|map| map.iter().next()) {
        Some((source, name)) => (
            Some(source.clone()),
            name.as_str().map(str::to_string),
        ),
        None => (None, None),
    }
}

/// Reads a bytecode field that is either a bare hex string or `{ "object": "0x…" }`.
fn bytecode_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("object")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    let mut current = value;
    for key in keys {
        current = current.get(key)?;
    }
    current.as_str().map(str::to_string)
}
