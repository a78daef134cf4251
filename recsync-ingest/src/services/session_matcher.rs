//! Nearest-session matching
//!
//! Each file is matched on its own: the session whose start time is closest
//! to the capture timestamp wins, as long as the gap is strictly inside the
//! acceptance window. Equal gaps go to the session listed first. Sessions may
//! be matched by any number of files.

use chrono::{Duration, NaiveDateTime};
use recsync_common::time::abs_delta;

use crate::models::SessionRecord;

/// Acceptance window (exclusive)
pub const DEFAULT_WINDOW_MINUTES: i64 = 60;

/// Session chosen for a capture timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMatch<'a> {
    pub session: &'a SessionRecord,
    /// Absolute distance between capture and session start
    pub delta: Duration,
}

/// Nearest-neighbor matcher with a hard rejection radius
#[derive(Debug, Clone, Copy)]
pub struct SessionMatcher {
    window: Duration,
}

impl SessionMatcher {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Closest session to `timestamp`, or `None` if none is inside the window
    pub fn find_closest<'a>(
        &self,
        timestamp: NaiveDateTime,
        schedule: &'a [SessionRecord],
    ) -> Option<SessionMatch<'a>> {
        let mut best: Option<SessionMatch<'a>> = None;
        let mut min_delta = self.window;

        for session in schedule {
            let delta = abs_delta(session.session_datetime, timestamp);
            // Strict comparison keeps the first of equal candidates
            if delta < min_delta {
                min_delta = delta;
                best = Some(SessionMatch { session, delta });
            }
        }

        best
    }
}

impl Default for SessionMatcher {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_WINDOW_MINUTES))
    }
}
