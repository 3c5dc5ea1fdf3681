//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("'{}' does not exist or is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    #[error("failed to load tool keyword list from {}: {reason}", .path.display())]
    KeywordList { path: PathBuf, reason: String },

    #[error("failed to serialize findings: {0}")]
    Serialize(#[from] serde_json::Error),
}
