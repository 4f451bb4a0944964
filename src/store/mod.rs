//! Repository seams for work logs and users.
//!
//! Handlers only ever talk to the [`WorkLogStore`] and [`UserDirectory`]
//! traits; the in-memory implementations in [`memory`] back the service and
//! its tests. A database-backed store slots in behind the same traits.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::user::User;
use crate::models::work_log::{NewWorkLog, WorkLog, WorkLogPatch};
use crate::services::query::LogFilter;

pub mod memory;
pub mod seed;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("work log {0} not found")]
    NotFound(Uuid),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait WorkLogStore: Send + Sync {
    /// Logs matching the owner and inclusive date bounds, in insertion order.
    async fn list(&self, filter: &LogFilter) -> StoreResult<Vec<WorkLog>>;

    async fn get(&self, id: Uuid) -> StoreResult<WorkLog>;

    async fn create(&self, new_log: NewWorkLog) -> StoreResult<WorkLog>;

    async fn update(&self, id: Uuid, patch: WorkLogPatch) -> StoreResult<WorkLog>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Vec<User>;

    async fn get_user(&self, id: Uuid) -> Option<User>;

    async fn developers(&self) -> Vec<User> {
        self.list_users()
            .await
            .into_iter()
            .filter(|u| !u.is_manager())
            .collect()
    }

    async fn manager_of_team(&self, team_id: Uuid) -> Option<User> {
        self.list_users()
            .await
            .into_iter()
            .find(|u| u.is_manager() && u.team_id == Some(team_id))
    }
}
