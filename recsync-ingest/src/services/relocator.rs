//! Two-phase relocation of matched recordings
//!
//! `watch/<original>` → `processing/<destination>` → `recordings/<destination>`.
//! Each step is a single rename, so after a crash the file is either still
//! in the watch directory, parked in the processing area, or done. Nothing is
//! rolled back on failure: the file stays where the last successful step put it.

use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

use crate::error::RelocationError;
use crate::types::RecordingStore;
use recsync_common::DirectoryLayout;

/// Where a file currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationStage {
    Watch,
    Processing,
    Recordings,
}

impl fmt::Display for RelocationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelocationStage::Watch => "watch",
            RelocationStage::Processing => "processing",
            RelocationStage::Recordings => "recordings",
        };
        f.write_str(name)
    }
}

/// Relocation failure with the stage the file was left at
#[derive(Debug)]
pub struct RelocationFailure {
    pub stage: RelocationStage,
    pub error: RelocationError,
}

/// Destination name for a matched recording
pub fn destination_name(course_number: &str, original: &str) -> String {
    format!("{}_{}", course_number, original)
}

/// Performs the two renames through a [`RecordingStore`]
pub struct Relocator<'a> {
    store: &'a dyn RecordingStore,
    layout: &'a DirectoryLayout,
}

impl<'a> Relocator<'a> {
    pub fn new(store: &'a dyn RecordingStore, layout: &'a DirectoryLayout) -> Self {
        Self { store, layout }
    }

    /// Whether `destination` already exists in the processing or recordings area
    pub async fn already_handled(&self, destination: &str) -> bool {
        self.store.contains(&self.layout.processing.join(destination)).await
            || self.store.contains(&self.layout.recordings.join(destination)).await
    }

    /// Move `original` out of the watch directory into the recordings area
    ///
    /// Returns the final path.
    pub async fn relocate(
        &self,
        original: &str,
        destination: &str,
    ) -> Result<PathBuf, RelocationFailure> {
        let source = self.layout.watch.join(original);
        let holding = self.layout.processing.join(destination);
        let target = self.layout.recordings.join(destination);

        self.store
            .move_file(&source, &holding)
            .await
            .map_err(|error| fail(RelocationStage::Watch, error))?;
        info!("File moved to processing: {}", holding.display());

        self.store
            .move_file(&holding, &target)
            .await
            .map_err(|error| fail(RelocationStage::Processing, error))?;
        info!("File moved to final recordings: {}", target.display());

        Ok(target)
    }
}

fn fail(stage: RelocationStage, error: RelocationError) -> RelocationFailure {
    error!(stage = %stage, "Relocation failed, file left in {} area: {}", stage, error);
    RelocationFailure { stage, error }
}
