pub mod charts;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod reminders;
pub mod reports;
pub mod team;
pub mod users;
pub mod work_logs;
pub mod ws;

use chrono::{Duration, NaiveDate, Utc};

/// Default look-back for dashboards, rollups and report exports.
pub(crate) const DEFAULT_WINDOW_DAYS: i64 = 30;

/// The server's current calendar day (UTC).
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// First day of the default window ending on `end`.
pub(crate) fn window_start(end: NaiveDate) -> NaiveDate {
    end - Duration::days(DEFAULT_WINDOW_DAYS)
}
