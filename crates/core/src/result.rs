//! Core results and error types

use thiserror::Error;

/// Core error type encompassing all core module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file at the specified path.
    #[error("could not read file '{path}': {source}")]
    FileRead {
        /// The path to the file that could not be read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Heimdall disassembly operation failed.
    #[error("heimdall disassembly failed: {0}")]
    Heimdall(String),

    /// Failed to decode hex string.
    #[error("hex decode failed: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Disassembler produced no output for a non-empty input.
    #[error("disassembler returned empty output")]
    EmptyDisassembly,

    /// Artifact JSON could not be parsed.
    #[error("malformed artifact '{path}': {source}")]
    MalformedArtifact {
        /// The path to the artifact that could not be parsed.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but carries neither bytecode nor an ABI.
    #[error("'{0}' is not a compiled-contract artifact")]
    NotAnArtifact(String),

    /// No artifact matched the requested source file and contract name.
    #[error("no artifact found for contract '{contract}' under '{root}'")]
    ArtifactNotFound {
        /// The contract name that was looked up.
        contract: String,
        /// The artifact root that was searched.
        root: String,
    },
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
