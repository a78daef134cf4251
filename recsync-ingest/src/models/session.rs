//! Canonical session record

use chrono::NaiveDateTime;

/// Scheduled session parsed from one board item
///
/// Only exists when the item's date/time cell parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub course_subject: Option<String>,
    pub course_number: Option<String>,
    pub midas_id: Option<String>,
    pub email: Option<String>,
    pub session_datetime: NaiveDateTime,
}

impl SessionRecord {
    /// Session at `session_datetime` with every optional field unset
    pub fn at(session_datetime: NaiveDateTime) -> Self {
        Self {
            course_subject: None,
            course_number: None,
            midas_id: None,
            email: None,
            session_datetime,
        }
    }

    /// Course number as substituted into destination names (empty when unset)
    pub fn course_number_or_empty(&self) -> &str {
        self.course_number.as_deref().unwrap_or("")
    }
}
