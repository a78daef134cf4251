//! Per-file pipeline types

use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::services::relocator::RelocationStage;

/// File found in the watch directory with its capture timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub filename: String,
    pub timestamp: NaiveDateTime,
}

/// What happened to one file during a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Filename carries no capture timestamp
    NoTimestamp,
    /// Timestamp text present but not a real calendar time
    InvalidTimestamp,
    /// No session within the acceptance window
    NoMatch,
    /// Dry run: matched, nothing moved
    Matched { destination: String },
    /// Destination name already present downstream; file left in place
    AlreadyHandled { destination: String },
    /// A relocation step failed; file left at `stage`
    RelocationFailed { stage: RelocationStage },
    /// Relocated but upload failed
    PublishFailed { path: PathBuf },
    /// Relocated and uploaded
    Published { path: PathBuf, entry_id: String },
}

/// Counters logged at the end of a pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub sessions: usize,
    pub files_seen: usize,
    pub matched: usize,
    pub published: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PassSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::NoTimestamp
            | FileOutcome::InvalidTimestamp
            | FileOutcome::NoMatch
            | FileOutcome::AlreadyHandled { .. } => self.skipped += 1,
            FileOutcome::Matched { .. } => self.matched += 1,
            FileOutcome::RelocationFailed { .. } => {
                self.matched += 1;
                self.failed += 1;
            }
            FileOutcome::PublishFailed { .. } => {
                self.matched += 1;
                self.failed += 1;
            }
            FileOutcome::Published { .. } => {
                self.matched += 1;
                self.published += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = PassSummary::default();
        summary.record(&FileOutcome::NoTimestamp);
        summary.record(&FileOutcome::NoMatch);
        summary.record(&FileOutcome::Published {
            path: PathBuf::from("/r/CS101_a.mov"),
            entry_id: "0_abc".to_string(),
        });
        summary.record(&FileOutcome::RelocationFailed {
            stage: RelocationStage::Processing,
        });

        assert_eq!(summary.files_seen, 4);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.published, 1);
        assert_eq!(summary.failed, 1);
    }
}
