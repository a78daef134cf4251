//! Ingest pass orchestration
//!
//! One pass:
//! 1. Fetch the board once (failure aborts the pass)
//! 2. Normalize it into the canonical schedule
//! 3. List the watch directory once
//! 4. For each file in order: extract timestamp → match → relocate → publish
//!
//! Files are processed sequentially and independently; a failure on one file
//! is logged and never affects the next.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::models::{CandidateFile, FileOutcome, PassSummary, SessionRecord};
use crate::services::relocator::{destination_name, Relocator};
use crate::services::schedule_normalizer::normalize_schedule;
use crate::services::session_matcher::SessionMatcher;
use crate::services::timestamp_extractor::{ExtractError, TimestampExtractor};
use crate::types::{BoardSource, Notifier, Publisher, RecordingStore};
use crate::error::IngestResult;
use recsync_common::time::format_session_time;
use recsync_common::DirectoryLayout;

pub const NOTIFICATION_SUBJECT: &str = "Your video is ready in Canvas under 'My Media'";

/// Static settings for a pass
#[derive(Debug, Clone)]
pub struct PassSettings {
    pub board_id: u64,
    pub layout: DirectoryLayout,
    pub window: Duration,
    pub filename_prefix: String,
}

/// Publication side of a live run
#[derive(Clone)]
pub struct Publication {
    pub publisher: Arc<dyn Publisher>,
    pub notifier: Arc<dyn Notifier>,
    /// Owner used when the session email has no account
    pub default_owner: String,
}

/// Live runs move and publish; dry runs only report matches
#[derive(Clone)]
pub enum RunMode {
    DryRun,
    Live(Publication),
}

/// Sequences the reconciliation pipeline for one pass
pub struct IngestOrchestrator {
    settings: PassSettings,
    board: Arc<dyn BoardSource>,
    store: Arc<dyn RecordingStore>,
    mode: RunMode,
    extractor: TimestampExtractor,
    matcher: SessionMatcher,
}

impl IngestOrchestrator {
    pub fn new(
        settings: PassSettings,
        board: Arc<dyn BoardSource>,
        store: Arc<dyn RecordingStore>,
        mode: RunMode,
    ) -> Result<Self, regex::Error> {
        let extractor = TimestampExtractor::new(&settings.filename_prefix)?;
        let matcher = SessionMatcher::new(settings.window);

        Ok(Self {
            settings,
            board,
            store,
            mode,
            extractor,
            matcher,
        })
    }

    /// Run one complete pass
    ///
    /// # Errors
    /// Only when the board or the watch directory is unavailable; no file is
    /// touched in that case.
    pub async fn run_pass(&self) -> IngestResult<PassSummary> {
        let items = self.board.fetch_board(self.settings.board_id).await.map_err(|e| {
            error!("Failed to retrieve board data: {}", e);
            e
        })?;

        let schedule = normalize_schedule(&items);
        let files = self.store.list_candidates().await.map_err(|e| {
            error!("Failed to list watch directory: {}", e);
            e
        })?;

        info!(
            sessions = schedule.len(),
            files = files.len(),
            "Starting ingest pass"
        );

        let mut summary = PassSummary {
            sessions: schedule.len(),
            ..Default::default()
        };

        for filename in &files {
            let outcome = self.process_file(filename, &schedule).await;
            debug!(file = %filename, outcome = ?outcome, "File processed");
            summary.record(&outcome);
        }

        info!(
            files = summary.files_seen,
            matched = summary.matched,
            published = summary.published,
            skipped = summary.skipped,
            failed = summary.failed,
            "Ingest pass complete"
        );

        Ok(summary)
    }

    /// Repeat passes every `interval` until `shutdown` completes
    ///
    /// The first pass starts immediately. A failed pass only skips that
    /// round. `shutdown` is checked before every pass, so an interrupt that
    /// arrives mid-pass ends the loop as soon as that pass returns. Returns
    /// the number of passes started.
    pub async fn run_until<F>(&self, interval: std::time::Duration, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval.max(std::time::Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut passes = 0;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(passes = passes, "Interrupted, shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    passes += 1;
                    if let Err(e) = self.run_pass().await {
                        error!("Ingest pass aborted: {}", e);
                    }
                }
            }
        }
        passes
    }

    /// Run the pipeline for a single watch-directory file
    pub async fn process_file(&self, filename: &str, schedule: &[SessionRecord]) -> FileOutcome {
        let timestamp = match self.extractor.extract(filename) {
            Ok(ts) => ts,
            Err(ExtractError::NoTimestamp) => {
                debug!(file = %filename, "No capture timestamp in filename, skipping");
                return FileOutcome::NoTimestamp;
            }
            Err(e) => {
                error!(file = %filename, "Error parsing timestamp from filename: {}", e);
                return FileOutcome::InvalidTimestamp;
            }
        };
        let candidate = CandidateFile {
            filename: filename.to_string(),
            timestamp,
        };

        let Some(found) = self.matcher.find_closest(candidate.timestamp, schedule) else {
            info!(file = %filename, "No close match found");
            return FileOutcome::NoMatch;
        };
        let session = found.session;

        let destination = destination_name(session.course_number_or_empty(), filename);
        info!(
            file = %filename,
            destination = %destination,
            session_datetime = %session.session_datetime,
            delta_minutes = found.delta.num_minutes(),
            "Matched file to session"
        );

        let publication = match &self.mode {
            RunMode::DryRun => {
                info!(file = %filename, "Dry run: leaving file in place");
                return FileOutcome::Matched { destination };
            }
            RunMode::Live(publication) => publication,
        };

        let relocator = Relocator::new(self.store.as_ref(), &self.settings.layout);
        if relocator.already_handled(&destination).await {
            error!(
                file = %filename,
                destination = %destination,
                "Destination already exists downstream; leaving file in watch directory"
            );
            return FileOutcome::AlreadyHandled { destination };
        }

        let final_path = match relocator.relocate(filename, &destination).await {
            Ok(path) => path,
            Err(failure) => return FileOutcome::RelocationFailed { stage: failure.stage },
        };

        self.publish(publication, &candidate, &destination, &final_path, session)
            .await
    }

    /// Upload, assign ownership, notify
    async fn publish(
        &self,
        publication: &Publication,
        candidate: &CandidateFile,
        title: &str,
        path: &Path,
        session: &SessionRecord,
    ) -> FileOutcome {
        let entry_id = match publication.publisher.publish(path, title).await {
            Ok(id) => {
                info!(title = %title, entry_id = %id, "Video uploaded");
                id
            }
            Err(e) => {
                error!(title = %title, "Error uploading video: {}", e);
                return FileOutcome::PublishFailed {
                    path: path.to_path_buf(),
                };
            }
        };

        let owner = self.resolve_owner(publication, session.email.as_deref()).await;
        match publication.publisher.set_owner(&entry_id, &owner).await {
            Ok(()) => info!(entry_id = %entry_id, owner = %owner, "Owner updated"),
            Err(e) => error!(entry_id = %entry_id, owner = %owner, "Error updating owner: {}", e),
        }

        match session.email.as_deref() {
            Some(address) => {
                let body = notification_body(title, &candidate.filename, title, session);
                match publication
                    .notifier
                    .notify(address, NOTIFICATION_SUBJECT, &body)
                    .await
                {
                    Ok(()) => info!(to = %address, "Notification sent"),
                    Err(e) => error!(to = %address, "Notification not sent: {}", e),
                }
            }
            None => warn!(title = %title, "Session has no email; notification skipped"),
        }

        FileOutcome::Published {
            path: path.to_path_buf(),
            entry_id,
        }
    }

    /// Account for `email`, falling back to the default owner
    async fn resolve_owner(&self, publication: &Publication, email: Option<&str>) -> String {
        let Some(email) = email else {
            warn!(
                "Session has no email; using default owner {}",
                publication.default_owner
            );
            return publication.default_owner.clone();
        };

        match publication.publisher.resolve_account(email).await {
            Ok(Some(account)) => {
                info!(email = %email, account = %account, "Account found");
                account
            }
            Ok(None) => {
                warn!(
                    "Account not found: {}. Using default owner {}",
                    email, publication.default_owner
                );
                publication.default_owner.clone()
            }
            Err(e) => {
                warn!(
                    "Account lookup for {} failed: {}. Using default owner {}",
                    email, e, publication.default_owner
                );
                publication.default_owner.clone()
            }
        }
    }
}

/// Plain-text notification body
pub fn notification_body(
    title: &str,
    original_filename: &str,
    renamed_filename: &str,
    session: &SessionRecord,
) -> String {
    format!(
        "Dear User,\n\
         \n\
         Your video titled '{}' is now available in Canvas under your 'My Media' folder.\n\
         \n\
         Details:\n\
         - Original Filename: {}\n\
         - Renamed Filename: {}\n\
         - Date: {}\n",
        title,
        original_filename,
        renamed_filename,
        format_session_time(&session.session_datetime)
    )
}
