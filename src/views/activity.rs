//! Sidebar feeds derived from the case collection: newest cases and
//! "new in the last day" notifications.

use chrono::{DateTime, Duration, Utc};

use crate::cases::Case;

/// How many cases the recent-activity feed shows.
pub const RECENT_ACTIVITY_LIMIT: usize = 4;

/// Cases created inside the notification window, default 24 hours.
pub fn notification_window() -> Duration {
    Duration::hours(24)
}

/// Newest cases first, capped at `limit`.
pub fn recent_activity(cases: &[Case], limit: usize) -> Vec<Case> {
    let mut sorted: Vec<Case> = cases.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Cases created within `window` before `now`, newest first.
pub fn new_case_notifications(
    cases: &[Case],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Case> {
    let cutoff = now - window;
    let mut fresh: Vec<Case> = cases
        .iter()
        .filter(|c| c.created_at >= cutoff && c.created_at <= now)
        .cloned()
        .collect();
    fresh.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    fresh
}
