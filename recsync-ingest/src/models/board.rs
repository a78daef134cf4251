//! Raw board records as delivered by the work-management board
//!
//! These are transient: the schedule normalizer turns them into
//! [`SessionRecord`](super::SessionRecord)s and drops them.

use serde::Deserialize;

/// One `(column id, text)` cell of a board item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnValue {
    /// Column identifier (e.g. `course_number__1`)
    pub id: String,
    /// Display text; the board sends `null` for empty cells
    #[serde(default)]
    pub text: Option<String>,
}

/// Board item (row) with its unordered column cells
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawBoardItem {
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

impl RawBoardItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_values: Vec::new(),
        }
    }

    /// Builder helper used by board fakes and tests
    pub fn with_column(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.column_values.push(ColumnValue {
            id: id.into(),
            text: Some(text.into()),
        });
        self
    }
}
