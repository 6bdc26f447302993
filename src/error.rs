//! Error types.
//!
//! Formatting and grouping never fail; these cover memo parsing and the
//! command-line front end.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoError {
    #[error("memo has no //f// sender marker")]
    MissingSender,
    #[error("invalid sender identity: {0}")]
    InvalidSender(String),
    #[error("invalid memo timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("memo has no text and no amount")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no configuration directory available")]
    NoConfigDir,
}
