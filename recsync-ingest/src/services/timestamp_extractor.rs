//! Capture timestamp extraction from recording filenames
//!
//! Capture software names files like `OBS Pro 2024-03-05 14-30-00 clip.mov`.
//! The time portion uses hyphens so the name stays filesystem-safe.

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;
use thiserror::Error;

/// Prefix written by the capture software
pub const DEFAULT_FILENAME_PREFIX: &str = "OBS Pro";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Extraction failures (per file, never fatal)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Filename does not contain `<prefix> YYYY-MM-DD HH-MM-SS`
    #[error("no capture timestamp in filename")]
    NoTimestamp,

    /// Pattern matched but the text is not a real calendar time
    #[error("invalid capture timestamp '{text}': {reason}")]
    InvalidTimestamp { text: String, reason: String },
}

/// Extracts capture timestamps from filenames
#[derive(Debug, Clone)]
pub struct TimestampExtractor {
    pattern: Regex,
}

impl TimestampExtractor {
    /// Extractor for filenames carrying `prefix`
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"{} (\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}-\d{{2}}-\d{{2}})",
            regex::escape(prefix)
        ))?;
        Ok(Self { pattern })
    }

    /// Capture timestamp embedded in `filename`
    pub fn extract(&self, filename: &str) -> Result<NaiveDateTime, ExtractError> {
        let captures = self
            .pattern
            .captures(filename)
            .ok_or(ExtractError::NoTimestamp)?;
        let text = &captures[1];

        let invalid = |reason: String| ExtractError::InvalidTimestamp {
            text: text.to_string(),
            reason,
        };
        let ts = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .map_err(|e| invalid(e.to_string()))?;

        // chrono represents second 60 as a leap second; wall clocks never show it
        if ts.nanosecond() >= 1_000_000_000 {
            return Err(invalid("second out of range".to_string()));
        }
        Ok(ts)
    }
}
