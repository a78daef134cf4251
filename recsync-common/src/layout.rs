//! Working directory layout
//!
//! Recordings flow through three directories:
//! - watch: where the capture software drops new files
//! - processing: holding area while a file is being relocated
//! - recordings: final location of renamed files

use crate::config::DirectoriesSection;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_WATCH_DIR: &str = "OBS-Files";
pub const DEFAULT_PROCESSING_DIR: &str = "OBS-Processing";
pub const DEFAULT_RECORDINGS_DIR: &str = "OBS-Recordings";

/// Resolved working directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub watch: PathBuf,
    pub processing: PathBuf,
    pub recordings: PathBuf,
}

impl DirectoryLayout {
    /// Build the layout under `root`, honoring per-directory overrides
    pub fn from_root(root: &Path, overrides: &DirectoriesSection) -> Self {
        Self {
            watch: overrides
                .watch
                .clone()
                .unwrap_or_else(|| root.join(DEFAULT_WATCH_DIR)),
            processing: overrides
                .processing
                .clone()
                .unwrap_or_else(|| root.join(DEFAULT_PROCESSING_DIR)),
            recordings: overrides
                .recordings
                .clone()
                .unwrap_or_else(|| root.join(DEFAULT_RECORDINGS_DIR)),
        }
    }

    /// Create any missing directory
    pub fn ensure_exists(&self) -> Result<()> {
        for dir in [&self.watch, &self.processing, &self.recordings] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                info!("Created directory: {}", dir.display());
            }
        }
        Ok(())
    }
}
