//! Error taxonomy for a documentation run.
//!
//! Whole-run input failures (documentation file, source root, output root)
//! abort the run. Per-type failures (`MissingSource`, `AmbiguousSource`) and
//! per-file write failures are reported and skipped by the orchestrator.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("documentation file not found or unreadable: {path}")]
    DocSourceMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("documentation file {path} is malformed: {reason}")]
    MalformedDocs { path: PathBuf, reason: String },

    #[error("source root is not a directory: {0}")]
    SourceRootMissing(PathBuf),

    #[error("invalid source pattern {pattern}: {reason}")]
    SourcePattern { pattern: String, reason: String },

    #[error("no source file declares type {type_name}")]
    MissingSource { type_name: String },

    #[error("type {type_name} is declared by {} files: {}", .candidates.len(), display_paths(.candidates))]
    AmbiguousSource {
        type_name: String,
        candidates: Vec<PathBuf>,
    },

    #[error("assembly name {name:?} cannot name the output directory")]
    InvalidAssemblyName { name: String },

    #[error("type {type_name} is listed more than once")]
    DuplicateType { type_name: String },

    #[error("{} already documents another type, skipping {type_name}", .path.display())]
    SourceAlreadyUsed { type_name: String, path: PathBuf },

    #[error("failed to prepare output directory {path}")]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy stylesheet {path}")]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// True for failures scoped to a single type or file; the run continues.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::MissingSource { .. }
                | Error::AmbiguousSource { .. }
                | Error::DuplicateType { .. }
                | Error::SourceAlreadyUsed { .. }
                | Error::Write { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
