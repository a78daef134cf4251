//! Local recording store
//!
//! Lists candidate recordings in the watch directory and moves files between
//! the working directories. Listing is non-recursive: capture software writes
//! straight into the watch directory.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{RelocationError, ScanError};
use crate::types::RecordingStore;
use recsync_common::DirectoryLayout;

/// Extension of recordings written by the capture software
pub const DEFAULT_EXTENSION: &str = "mov";

/// Filesystem-backed [`RecordingStore`]
pub struct LocalRecordingStore {
    watch_dir: PathBuf,
    extension: String,
}

impl LocalRecordingStore {
    pub fn new(layout: &DirectoryLayout, extension: impl Into<String>) -> Self {
        Self {
            watch_dir: layout.watch.clone(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    /// Synchronous listing of candidate filenames, sorted by name
    pub fn scan(&self) -> Result<Vec<String>, ScanError> {
        if !self.watch_dir.exists() {
            return Err(ScanError::PathNotFound(self.watch_dir.clone()));
        }

        if !self.watch_dir.is_dir() {
            return Err(ScanError::NotADirectory(self.watch_dir.clone()));
        }

        let mut names = Vec::new();
        let walker = WalkDir::new(&self.watch_dir)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1)
            .into_iter();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if !self.has_candidate_extension(entry.path()) {
                        continue;
                    }
                    match entry.file_name().to_str() {
                        Some(name) => names.push(name.to_string()),
                        None => warn!("Skipping non UTF-8 filename: {}", entry.path().display()),
                    }
                }
                // Depth 0 is the watch directory itself; nothing can be listed
                Err(e) if e.depth() == 0 => {
                    return Err(ScanError::Io(format!("{}: {}", self.watch_dir.display(), e)));
                }
                Err(e) => {
                    // Continue scanning, don't abort
                    warn!("Error accessing entry: {}", e);
                }
            }
        }

        names.sort();
        debug!(
            watch_dir = %self.watch_dir.display(),
            count = names.len(),
            "Candidate files discovered"
        );

        Ok(names)
    }

    fn has_candidate_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl RecordingStore for LocalRecordingStore {
    async fn list_candidates(&self) -> Result<Vec<String>, ScanError> {
        self.scan()
    }

    async fn contains(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn move_file(&self, src: &Path, dst: &Path) -> Result<(), RelocationError> {
        if !tokio::fs::try_exists(src).await.unwrap_or(false) {
            return Err(RelocationError::SourceNotFound(src.to_path_buf()));
        }

        // rename() silently replaces on Unix; never clobber a finished recording
        if tokio::fs::try_exists(dst).await.unwrap_or(false) {
            return Err(RelocationError::DestinationExists(dst.to_path_buf()));
        }

        tokio::fs::rename(src, dst).await.map_err(|e| {
            RelocationError::Io(src.to_path_buf(), dst.to_path_buf(), e.to_string())
        })
    }
}
