//! Error types for barcode_scanner

use thiserror::Error;

/// Unified error type for scanner operations
///
/// Lookup failures are not errors: they are classified into
/// [`LookupOutcome`](crate::catalog::LookupOutcome) values. This type covers
/// the plumbing around them (HTTP client setup, files, decoding).
#[derive(Debug, Error)]
pub enum ScanError {
    /// HTTP client could not be built or a request failed outside classification
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    /// File I/O failed (disk full, permission denied, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization failed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The decode primitive could not process a frame
    #[error("Decode failed: {0}")]
    Decode(String),
    /// No destination directory for export could be determined
    #[error("No export directory available")]
    NoExportDir,
}

/// Result alias for scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;
