//! Error types for recsync-ingest
//!
//! Only board and scan failures abort a pass. Everything else is isolated to
//! the file being processed and ends up as a logged
//! [`FileOutcome`](crate::models::FileOutcome).

use std::path::PathBuf;
use thiserror::Error;

/// Board collaborator errors
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Malformed board response: {0}")]
    Malformed(String),
}

/// Watch directory listing errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

/// File move errors
#[derive(Debug, Error)]
pub enum RelocationError {
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Move {0} -> {1} failed: {2}")]
    Io(PathBuf, PathBuf, String),
}

/// Video-host publication errors
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    /// API-level exception reported in a successful HTTP response
    #[error("API exception {0}: {1}")]
    Api(String, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("File error {0}: {1}")]
    File(PathBuf, String),
}

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport settings incomplete; nothing was sent
    #[error("SMTP configuration is incomplete")]
    NotConfigured,

    #[error("Invalid address {0}: {1}")]
    Address(String, String),

    #[error("Message build error: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Pass-level error: the whole pass is aborted
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Board data unavailable: {0}")]
    Board(#[from] BoardError),

    #[error("Watch directory unavailable: {0}")]
    Scan(#[from] ScanError),
}

/// Result type for a pass
pub type IngestResult<T> = Result<T, IngestError>;
