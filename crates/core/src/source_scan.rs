//! Best-effort textual scan of Solidity sources for delegatecall idioms.
//!
//! This is a corroborating signal, not an authoritative one: regex over raw text, no
//! parsing. A match inside a comment or string literal still counts, and an aliased or
//! obfuscated call is missed. The correlator only ever uses this to confirm bytecode
//! evidence, so that trade-off is accepted by contract and deliberately left alone.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Textual delegatecall idioms, one regex per rule. Versioned rule table.
const SOURCE_PATTERNS: &[&str] = &[
    // method-call syntax: `target.delegatecall(…)`, optionally with call options
    r"\.\s*delegatecall\s*(\{[^}]*\}\s*)?\(",
    // OpenZeppelin-style safe forwarding helper
    r"functionDelegateCall\s*\(",
    // inline assembly block containing the bare token
    r#"(?s)assembly\s*("[^"]*"\s*)?\{.*?\bdelegatecall\b"#,
];

static COMPILED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SOURCE_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("source pattern compiles"))
        .collect()
});

/// True iff the text matches any of the delegatecall idioms.
pub fn text_matches(text: &str) -> bool {
    COMPILED.iter().any(|re| re.is_match(text))
}

/// Scans source files declared by an artifact, resolving paths against a project root.
pub struct SourceScanner {
    project_root: PathBuf,
}

impl SourceScanner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Best-effort pattern match over the given source file.
    ///
    /// The exact path is tried first (relative to the project root, then as given);
    /// when it does not exist on disk, the project tree is searched for a file with
    /// the same name. An unreadable or unlocatable file is "no hit", never an error.
    pub fn matches(&self, path: &str) -> bool {
        match self.read_source(path) {
            Some(text) => text_matches(&text),
            None => {
                tracing::debug!("source file not found for '{path}', counting as no hit");
                false
            }
        }
    }

    /// Applies [`Self::matches`] to every declared import, keeping declaration order
    /// and dropping duplicates.
    pub fn import_hits(&self, paths: &[String]) -> Vec<String> {
        let mut hits: Vec<String> = Vec::new();
        for path in paths {
            if !hits.contains(path) && self.matches(path) {
                hits.push(path.clone());
            }
        }
        hits
    }

    fn read_source(&self, path: &str) -> Option<String> {
        let rooted = self.project_root.join(path);
        if rooted.is_file() {
            return fs::read_to_string(&rooted).ok();
        }
        let as_given = Path::new(path);
        if as_given.is_file() {
            return fs::read_to_string(as_given).ok();
        }

        // Fallback: filename search across the project tree. Remapped import paths
        // (`@openzeppelin/…`) rarely exist verbatim on disk.
        let wanted = as_given.file_name()?;
        WalkDir::new(&self.project_root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name() == wanted)
            .and_then(|entry| fs::read_to_string(entry.path()).ok())
    }
}
