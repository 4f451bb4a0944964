use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::events::DomainEvent;
use crate::services::query::LogFilter;
use crate::store::{UserDirectory, WorkLogStore};

/// One `ReminderDue` per developer with no log dated `today`.
pub async fn run_daily_reminders(
    store: &dyn WorkLogStore,
    users: &dyn UserDirectory,
    today: NaiveDate,
) -> AppResult<Vec<DomainEvent>> {
    let filter = LogFilter {
        user_id: None,
        start_date: Some(today),
        end_date: Some(today),
    };
    let submitted: HashSet<Uuid> = store
        .list(&filter)
        .await?
        .into_iter()
        .map(|log| log.user_id)
        .collect();

    let events: Vec<DomainEvent> = users
        .developers()
        .await
        .into_iter()
        .filter(|dev| !submitted.contains(&dev.id))
        .map(|dev| DomainEvent::ReminderDue {
            user_id: dev.id,
            date: today,
        })
        .collect();

    tracing::info!(date = %today, reminders = events.len(), "Daily reminders evaluated");
    Ok(events)
}

/// Time from `now` until the next `hour:00` UTC, strictly in the future.
pub fn until_next_run(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let Some(today_run) = now.date_naive().and_hms_opt(hour, 0, 0) else {
        return std::time::Duration::from_secs(24 * 60 * 60);
    };
    let mut next = today_run.and_utc();
    if next <= now {
        next += Duration::days(1);
    }
    (next - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{InMemoryUserDirectory, InMemoryWorkLogStore};
    use crate::store::seed;
    use chrono::TimeZone;
    use std::time::Duration as StdDuration;

    #[tokio::test]
    async fn test_reminds_only_developers_without_todays_log() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let mut logs = seed::demo_logs(today);
        // Keep only John's logs: Alex has nothing for today.
        logs.retain(|log| log.user_id == seed::DEVELOPER_ID);
        let store = InMemoryWorkLogStore::with_logs(logs, StdDuration::ZERO);
        let users = InMemoryUserDirectory::new(seed::demo_users());

        let events = run_daily_reminders(&store, &users, today).await.unwrap();
        assert_eq!(
            events,
            vec![DomainEvent::ReminderDue {
                user_id: seed::SECOND_DEVELOPER_ID,
                date: today,
            }]
        );
        assert_eq!(store.list(&LogFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_no_reminders_when_everyone_logged() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let store = InMemoryWorkLogStore::with_logs(seed::demo_logs(today), StdDuration::ZERO);
        let users = InMemoryUserDirectory::new(seed::demo_users());
        assert!(run_daily_reminders(&store, &users, today).await.unwrap().is_empty());
    }

    #[test]
    fn test_until_next_run() {
        let morning = Utc.with_ymd_and_hms(2026, 10, 14, 8, 30, 0).unwrap();
        assert_eq!(until_next_run(morning, 22), StdDuration::from_secs(13 * 3600 + 1800));

        let late = Utc.with_ymd_and_hms(2026, 10, 14, 22, 0, 0).unwrap();
        assert_eq!(until_next_run(late, 22), StdDuration::from_secs(24 * 3600));
    }
}
