//! Collaborator trait definitions
//!
//! The reconciliation pipeline talks to the outside world only through these
//! four traits:
//! - **BoardSource:** scheduling records from the work-management board
//! - **RecordingStore:** watch directory listing and file moves
//! - **Publisher:** video-host upload and ownership
//! - **Notifier:** owner notification
//!
//! Production implementations live in [`crate::clients`] and
//! [`crate::services::file_scanner`]; tests use in-memory fakes.

use std::path::Path;

use crate::error::{BoardError, NotifyError, PublishError, RelocationError, ScanError};
use crate::models::RawBoardItem;

/// Source of raw scheduling records
#[async_trait::async_trait]
pub trait BoardSource: Send + Sync {
    /// Fetch every item of the board
    ///
    /// # Errors
    /// Transport failure or malformed response. The caller treats this as
    /// fatal to the pass.
    async fn fetch_board(&self, board_id: u64) -> Result<Vec<RawBoardItem>, BoardError>;
}

/// Filesystem access for the watch, processing and recordings directories
#[async_trait::async_trait]
pub trait RecordingStore: Send + Sync {
    /// Names of candidate files in the watch directory, in a stable order
    async fn list_candidates(&self) -> Result<Vec<String>, ScanError>;

    /// Whether a file exists at `path`
    async fn contains(&self, path: &Path) -> bool;

    /// Move `src` to `dst` without overwriting an existing `dst`
    async fn move_file(&self, src: &Path, dst: &Path) -> Result<(), RelocationError>;
}

/// Video-hosting platform
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Account id registered under `email`, if any
    async fn resolve_account(&self, email: &str) -> Result<Option<String>, PublishError>;

    /// Upload `path` as a new entry titled `title`; returns the entry id
    async fn publish(&self, path: &Path, title: &str) -> Result<String, PublishError>;

    /// Assign `account` as owner of `entry_id`
    async fn set_owner(&self, entry_id: &str, account: &str) -> Result<(), PublishError>;
}

/// Owner notification channel
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}
