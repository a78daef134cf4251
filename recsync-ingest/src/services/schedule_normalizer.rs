//! Schedule normalizer
//!
//! Turns raw board items into the canonical schedule:
//! 1. Drop section-header rows injected by the board UI
//! 2. Map known column ids onto session fields
//! 3. Parse the combined date/time cell
//! 4. Keep only items whose date parsed, in board order
//!
//! A bad item is logged and skipped; it never fails the pass.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{RawBoardItem, SessionRecord};

/// Item names that are board UI section headers, not sessions
pub const EXCLUDED_ITEM_NAMES: [&str; 4] = [
    "Upcoming Reservations",
    "Rejected Reservations",
    "Past Reservations",
    "Name",
];

/// Date cell values that mean "no date" (compared case-insensitively)
const PLACEHOLDER_DATES: [&str; 2] = ["none", "session date and start time"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const RANGE_SEPARATOR: &str = " to ";

/// Session field fed by a board column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionField {
    CourseSubject,
    CourseNumber,
    SessionDateTime,
    MidasId,
    Email,
}

/// Board column id → session field
const COLUMN_FIELDS: [(&str, SessionField); 5] = [
    ("course_subject__1", SessionField::CourseSubject),
    ("course_number__1", SessionField::CourseNumber),
    ("color__1", SessionField::SessionDateTime),
    ("midas_id__1", SessionField::MidasId),
    ("email__1", SessionField::Email),
];

/// Why a date cell did not produce a timestamp
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRejection {
    /// Cell absent or empty
    #[error("missing session date")]
    Missing,

    /// Cell holds a placeholder such as "None" or the column header
    #[error("placeholder session date '{0}'")]
    Placeholder(String),

    /// Cell text matches none of the accepted formats
    #[error("'{0}' does not match expected formats")]
    Unparseable(String),
}

/// Parse a session date cell
///
/// Accepted, first match wins:
/// - `YYYY-MM-DD HH:MM`
/// - `YYYY-MM-DD` (midnight)
/// - `YYYY-MM-DD to YYYY-MM-DD` (start date only, midnight)
pub fn parse_session_datetime(text: Option<&str>) -> Result<NaiveDateTime, DateRejection> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Err(DateRejection::Missing),
    };

    let lowered = text.to_lowercase();
    if PLACEHOLDER_DATES.contains(&lowered.as_str()) {
        return Err(DateRejection::Placeholder(text.to_string()));
    }

    if let Some(parsed) = parse_date_and_time(text) {
        return Ok(parsed);
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    if let Some((start, _end)) = text.split_once(RANGE_SEPARATOR) {
        if let Ok(date) = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(DateRejection::Unparseable(text.to_string()))
}

/// `YYYY-MM-DD HH:MM` with exactly one space between date and time
///
/// A space in a chrono format matches any run of whitespace (or none), so the
/// split is done here.
fn parse_date_and_time(text: &str) -> Option<NaiveDateTime> {
    let (date, time) = text.split_once(' ')?;
    if date.is_empty() || time.is_empty() || time.contains(char::is_whitespace) {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT).ok()?;
    Some(date.and_time(time))
}

/// Whether an item is a section-header row
pub fn is_excluded_item(name: &str) -> bool {
    EXCLUDED_ITEM_NAMES.contains(&name)
}

/// Normalize one item; `None` when excluded or undated
pub fn normalize_item(item: &RawBoardItem) -> Option<SessionRecord> {
    if is_excluded_item(&item.name) {
        info!(item = %item.name, "Skipping section header item");
        return None;
    }

    let mut course_subject = None;
    let mut course_number = None;
    let mut date_text = None;
    let mut midas_id = None;
    let mut email = None;

    for column in &item.column_values {
        let field = COLUMN_FIELDS
            .iter()
            .find(|(id, _)| *id == column.id)
            .map(|(_, field)| *field);

        let slot = match field {
            Some(SessionField::CourseSubject) => &mut course_subject,
            Some(SessionField::CourseNumber) => &mut course_number,
            Some(SessionField::SessionDateTime) => &mut date_text,
            Some(SessionField::MidasId) => &mut midas_id,
            Some(SessionField::Email) => &mut email,
            None => continue,
        };
        *slot = column.text.clone();
    }

    match parse_session_datetime(date_text.as_deref()) {
        Ok(session_datetime) => {
            info!(
                item = %item.name,
                session_datetime = %session_datetime,
                "Parsed session date"
            );
            Some(SessionRecord {
                course_subject,
                course_number,
                midas_id,
                email,
                session_datetime,
            })
        }
        Err(rejection @ DateRejection::Unparseable(_)) => {
            error!(item = %item.name, "Error parsing session date: {}", rejection);
            None
        }
        Err(rejection) => {
            warn!(item = %item.name, "Invalid or missing session date: {}", rejection);
            None
        }
    }
}

/// Build the canonical schedule from raw board items, preserving order
pub fn normalize_schedule(items: &[RawBoardItem]) -> Vec<SessionRecord> {
    let schedule: Vec<SessionRecord> = items.iter().filter_map(normalize_item).collect();

    info!(
        items = items.len(),
        sessions = schedule.len(),
        "Schedule normalized"
    );

    schedule
}
