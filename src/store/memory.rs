use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::user::User;
use crate::models::work_log::{NewWorkLog, WorkLog, WorkLogPatch};
use crate::services::query::LogFilter;
use crate::store::{StoreError, StoreResult, UserDirectory, WorkLogStore};

/// Process-local work log collection. Every mutation takes the write lock,
/// so concurrent callers are serialized one operation at a time.
pub struct InMemoryWorkLogStore {
    logs: RwLock<Vec<WorkLog>>,
    latency: Duration,
}

impl InMemoryWorkLogStore {
    pub fn new(latency: Duration) -> Self {
        Self::with_logs(Vec::new(), latency)
    }

    pub fn with_logs(logs: Vec<WorkLog>, latency: Duration) -> Self {
        Self {
            logs: RwLock::new(logs),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for InMemoryWorkLogStore {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl WorkLogStore for InMemoryWorkLogStore {
    async fn list(&self, filter: &LogFilter) -> StoreResult<Vec<WorkLog>> {
        self.simulate_latency().await;
        let logs = self.logs.read().await;
        Ok(logs.iter().filter(|log| filter.matches(log)).cloned().collect())
    }

    async fn get(&self, id: Uuid) -> StoreResult<WorkLog> {
        self.simulate_latency().await;
        self.logs
            .read()
            .await
            .iter()
            .find(|log| log.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, new_log: NewWorkLog) -> StoreResult<WorkLog> {
        self.simulate_latency().await;
        let log = new_log.into_work_log(Uuid::new_v4());
        self.logs.write().await.push(log.clone());
        tracing::debug!(log_id = %log.id, user_id = %log.user_id, "Work log stored");
        Ok(log)
    }

    async fn update(&self, id: Uuid, patch: WorkLogPatch) -> StoreResult<WorkLog> {
        self.simulate_latency().await;
        let mut logs = self.logs.write().await;
        let log = logs
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(log);
        Ok(log.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.simulate_latency().await;
        let mut logs = self.logs.write().await;
        let before = logs.len();
        logs.retain(|log| log.id != id);
        if logs.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

pub struct InMemoryUserDirectory {
    users: Vec<User>,
}

impl InMemoryUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list_users(&self) -> Vec<User> {
        self.users.clone()
    }

    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mood::Mood;
    use crate::models::work_log::NewTask;
    use crate::store::seed;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn new_log(user_id: Uuid, date: NaiveDate) -> NewWorkLog {
        NewWorkLog {
            user_id,
            date,
            tasks: vec![NewTask {
                title: "Code review".into(),
                description: "Reviewed PR".into(),
                time_spent: 30,
                tags: vec!["review".into()],
                completed: true,
            }],
            mood: Mood::Neutral,
            blockers: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_get_returns_it() {
        let store = InMemoryWorkLogStore::default();
        let created = store.create(new_log(Uuid::new_v4(), day(4))).await.unwrap();
        assert!(!created.reviewed);
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = InMemoryWorkLogStore::default();
        let id = Uuid::new_v4();
        assert_eq!(store.get(id).await, Err(StoreError::NotFound(id)));
        assert_eq!(
            store.update(id, WorkLogPatch::default()).await,
            Err(StoreError::NotFound(id))
        );
        assert_eq!(store.delete(id).await, Err(StoreError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_list_filters_by_owner_and_inclusive_range() {
        let store = InMemoryWorkLogStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        for d in [1, 5, 10] {
            store.create(new_log(alice, day(d))).await.unwrap();
        }
        store.create(new_log(bob, day(5))).await.unwrap();

        let filter = LogFilter {
            user_id: Some(alice),
            start_date: Some(day(5)),
            end_date: Some(day(10)),
        };
        let logs = store.list(&filter).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.user_id == alice));
        assert_eq!(logs[0].date, day(5));
        assert_eq!(logs[1].date, day(10));
    }

    #[tokio::test]
    async fn test_delete_removes_log() {
        let store = InMemoryWorkLogStore::default();
        let created = store.create(new_log(Uuid::new_v4(), day(2))).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert!(store.list(&LogFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_kept() {
        let store = Arc::new(InMemoryWorkLogStore::new(Duration::from_millis(1)));
        let owner = Uuid::new_v4();
        let handles: Vec<_> = (1..=20)
            .map(|d| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_log(owner, day(d))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.list(&LogFilter::default()).await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_directory_finds_team_manager() {
        let directory = InMemoryUserDirectory::new(seed::demo_users());
        let developers = directory.developers().await;
        assert_eq!(developers.len(), 2);
        let manager = directory.manager_of_team(seed::DEMO_TEAM_ID).await.unwrap();
        assert_eq!(manager.id, seed::MANAGER_ID);
        assert!(directory.manager_of_team(Uuid::new_v4()).await.is_none());
    }
}
