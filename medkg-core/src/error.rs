//! Error types for medkg-core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a parse pass.
///
/// Parsing is all-or-nothing: no partial corpus is returned when one of these
/// is raised.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The corpus file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-blank line is not a JSON object of the expected shape.
    #[error("Malformed record on line {line}: {source}")]
    MalformedLine {
        /// 1-based line number in the input.
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record has no `name` string.
    #[error("Record on line {line} has no disease name")]
    MissingName { line: usize },
}

/// Errors raised while writing JSON snapshots.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
