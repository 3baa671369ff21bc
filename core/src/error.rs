use std::path::PathBuf;

use thiserror::Error;

/// Failures the log store cannot recover from locally.
///
/// Corrupt file contents are deliberately NOT represented here: the store
/// treats an unparseable log as empty (with a warning) so that one bad file
/// never blocks new complaints from being recorded. Only real I/O and
/// encoding failures reach callers, because then no entry can be durably
/// written at all.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read log file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),
}
