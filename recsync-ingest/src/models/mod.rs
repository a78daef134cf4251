//! Data models for the reconciliation pipeline

pub mod board;
pub mod candidate;
pub mod session;

pub use board::{ColumnValue, RawBoardItem};
pub use candidate::{CandidateFile, FileOutcome, PassSummary};
pub use session::SessionRecord;
