pub mod aggregate;
pub mod events;
pub mod notifications;
pub mod query;
pub mod reminders;
pub mod report;
pub mod time;
pub mod work_logs;
