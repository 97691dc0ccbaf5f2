//! Error types for the generation pipeline.
//!
//! Every failure aborts the generation pass for one language; nothing is
//! written for that target. The CLI wraps these in `anyhow` for reporting.

use std::{io, path::PathBuf};

use thiserror::Error;

/// A keyset source file could not be read or interpreted.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read keyset file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse keyset file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error(
        "Keyset file {} exports nothing (expected `module.exports = {{...}}` or `export default {{...}}`)",
        path.display()
    )]
    NoExports { path: PathBuf },
    #[error("{}:{line}: {message}", path.display())]
    Unsupported {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// A template value failed to parse or to resolve against the layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at offset {offset})")]
pub struct TemplateError {
    pub message: String,
    /// Byte offset into the template source.
    pub offset: usize,
}

impl TemplateError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// A template value could not be compacted, with enough context to find it.
#[derive(Debug, Error)]
#[error("Failed to compact {keyset}.{key}: {source}")]
pub struct CompactionError {
    pub keyset: String,
    pub key: String,
    #[source]
    pub source: TemplateError,
}

/// The runtime class source could not be read.
#[derive(Debug, Error)]
#[error("Failed to read runtime class file {}: {source}", path.display())]
pub struct DependencyReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Any failure of a single generation pass.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Compaction(#[from] CompactionError),
    #[error(transparent)]
    DependencyRead(#[from] DependencyReadError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
