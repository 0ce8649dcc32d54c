//! Dump errors.
//!
//! Every failure inside the pipeline is a [`DumpError`]. Nothing is recovered
//! locally: the orchestrator attaches the artifact path and hands the error
//! back as a [`DumpFailure`].

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::executor::ExecutorError;

/// Result type for pipeline operations
pub type DumpResult<T> = Result<T, DumpError>;

/// Errors that abort a dump.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Configuration was rejected while resolving the artifact.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An artifact with the resolved name is already present.
    #[error("Dump '{name}' already exists at {}", path.display())]
    DuplicateDump { name: String, path: PathBuf },

    /// The executor failed; the error is passed through unchanged.
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// Introspection echoed a different table than the one requested.
    #[error("returned table '{returned}' is not the same as requested table '{requested}'")]
    TableNameMismatch { requested: String, returned: String },

    /// A table reported no columns when its rows were selected.
    #[error("No columns in table {table}.")]
    NoColumns { table: String },

    /// `SHOW CREATE TABLE` answered with a shape none of the probes accept.
    #[error("unrecognized SHOW CREATE TABLE result for {table}: {columns} columns")]
    UnrecognizedCreateTableShape { table: String, columns: usize },

    /// The table listing produced a name that cannot be dumped.
    #[error("invalid table name {name:?}: {reason}")]
    InvalidTableName { name: String, reason: &'static str },

    /// Rendering the document failed.
    #[error("failed to render dump: {0}")]
    Render(#[from] std::fmt::Error),

    /// Writing the artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The dumper was closed.
    #[error("dumper is closed")]
    Closed,
}

impl DumpError {
    /// True for errors signalling that the environment returned data the
    /// pipeline refuses to guess around.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            DumpError::TableNameMismatch { .. }
                | DumpError::NoColumns { .. }
                | DumpError::UnrecognizedCreateTableShape { .. }
                | DumpError::InvalidTableName { .. }
        )
    }
}

/// A failed dump together with the best-known artifact path.
///
/// The path may point at a missing or incomplete file and must not be
/// treated as a usable dump.
#[derive(Debug, Error)]
#[error("dump to {} failed: {source}", path.display())]
pub struct DumpFailure {
    pub path: PathBuf,
    #[source]
    pub source: DumpError,
}

impl DumpFailure {
    pub fn new(path: PathBuf, source: DumpError) -> Self {
        Self { path, source }
    }

    pub fn into_error(self) -> DumpError {
        self.source
    }
}
