//! Reconciliation pipeline components
//!
//! - `schedule_normalizer`: raw board items → canonical schedule
//! - `timestamp_extractor`: filename → capture timestamp
//! - `session_matcher`: capture timestamp → nearest session
//! - `file_scanner`: local watch directory listing and moves
//! - `relocator`: two-phase rename into the recordings area
//! - `orchestrator`: one ingest pass end to end

pub mod file_scanner;
pub mod orchestrator;
pub mod relocator;
pub mod schedule_normalizer;
pub mod session_matcher;
pub mod timestamp_extractor;

pub use file_scanner::LocalRecordingStore;
pub use orchestrator::{IngestOrchestrator, PassSettings, Publication, RunMode};
pub use relocator::{RelocationStage, Relocator};
pub use schedule_normalizer::{normalize_schedule, parse_session_datetime, DateRejection};
pub use session_matcher::{SessionMatch, SessionMatcher};
pub use timestamp_extractor::{ExtractError, TimestampExtractor};
