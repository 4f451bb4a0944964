//! Domain events raised by mutations and the dispatcher that turns them into
//! side effects (inbox notifications and live-feed pushes).

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::notification::{Notification, NotificationKind};
use crate::services::notifications::NotificationStore;
use crate::store::UserDirectory;

pub const REMINDER_MESSAGE: &str = "Reminder: Please submit your daily log by 10 PM.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    LogSubmitted {
        log_id: Uuid,
        owner_id: Uuid,
        date: NaiveDate,
    },
    LogUpdated {
        log_id: Uuid,
        owner_id: Uuid,
    },
    LogReviewed {
        log_id: Uuid,
        owner_id: Uuid,
        reviewer_id: Uuid,
        reviewed: bool,
    },
    LogDeleted {
        log_id: Uuid,
        owner_id: Uuid,
    },
    ReminderDue {
        user_id: Uuid,
        date: NaiveDate,
    },
}

impl DomainEvent {
    /// The user the event is about; live-feed messages are routed by it.
    pub fn subject(&self) -> Uuid {
        match self {
            Self::LogSubmitted { owner_id, .. }
            | Self::LogUpdated { owner_id, .. }
            | Self::LogReviewed { owner_id, .. }
            | Self::LogDeleted { owner_id, .. } => *owner_id,
            Self::ReminderDue { user_id, .. } => *user_id,
        }
    }
}

/// A mutation result together with the events it raised.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub events: Vec<DomainEvent>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, events: Vec<DomainEvent>) -> Self {
        Self { value, events }
    }
}

#[derive(Clone)]
pub struct EventDispatcher {
    users: Arc<dyn UserDirectory>,
    notifications: NotificationStore,
    live_tx: Option<broadcast::Sender<String>>,
}

impl EventDispatcher {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        notifications: NotificationStore,
        live_tx: Option<broadcast::Sender<String>>,
    ) -> Self {
        Self {
            users,
            notifications,
            live_tx,
        }
    }

    pub async fn dispatch(&self, events: Vec<DomainEvent>) {
        for event in events {
            let recipients = self.notify(&event).await;
            self.broadcast(&event, event.subject());
            for recipient in recipients.into_iter().filter(|r| *r != event.subject()) {
                self.broadcast(&event, recipient);
            }
        }
    }

    /// Creates inbox entries for the event; returns who received one.
    async fn notify(&self, event: &DomainEvent) -> Vec<Uuid> {
        let notification = match event {
            DomainEvent::LogSubmitted { owner_id, .. } => {
                let Some(developer) = self.users.get_user(*owner_id).await else {
                    tracing::warn!(user_id = %owner_id, "Log submitted by unknown user");
                    return Vec::new();
                };
                let Some(team_id) = developer.team_id else {
                    return Vec::new();
                };
                let Some(manager) = self.users.manager_of_team(team_id).await else {
                    tracing::debug!(team_id = %team_id, "No manager to notify");
                    return Vec::new();
                };
                Notification::new(
                    manager.id,
                    format!("Developer {} has submitted a new work log.", developer.name),
                    NotificationKind::System,
                )
            }
            DomainEvent::LogReviewed {
                owner_id,
                reviewed: true,
                ..
            } => Notification::new(
                *owner_id,
                "Your work log has been reviewed.",
                NotificationKind::Review,
            ),
            DomainEvent::ReminderDue { user_id, .. } => {
                Notification::new(*user_id, REMINDER_MESSAGE, NotificationKind::Reminder)
            }
            _ => return Vec::new(),
        };

        tracing::info!(
            user_id = %notification.user_id,
            kind = ?notification.kind,
            "Notification created"
        );
        let recipient = notification.user_id;
        self.notifications.push(notification).await;
        vec![recipient]
    }

    fn broadcast(&self, event: &DomainEvent, user_id: Uuid) {
        let Some(tx) = self.live_tx.as_ref() else {
            return;
        };
        let mut msg = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize event");
                return;
            }
        };
        msg["user_id"] = serde_json::json!(user_id);
        // No subscribers is not an error.
        let _ = tx.send(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryUserDirectory;
    use crate::store::seed;

    fn dispatcher() -> (EventDispatcher, NotificationStore, broadcast::Receiver<String>) {
        let (tx, rx) = broadcast::channel(16);
        let inbox = NotificationStore::new();
        let users = Arc::new(InMemoryUserDirectory::new(seed::demo_users()));
        (EventDispatcher::new(users, inbox.clone(), Some(tx)), inbox, rx)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[tokio::test]
    async fn test_submission_notifies_team_manager() {
        let (dispatcher, inbox, _rx) = dispatcher();
        dispatcher
            .dispatch(vec![DomainEvent::LogSubmitted {
                log_id: Uuid::new_v4(),
                owner_id: seed::DEVELOPER_ID,
                date: today(),
            }])
            .await;

        let manager_inbox = inbox.for_user(seed::MANAGER_ID).await;
        assert_eq!(manager_inbox.len(), 1);
        assert_eq!(
            manager_inbox[0].message,
            "Developer John Developer has submitted a new work log."
        );
        assert_eq!(manager_inbox[0].kind, NotificationKind::System);
    }

    #[tokio::test]
    async fn test_review_notifies_owner_only_when_reviewed() {
        let (dispatcher, inbox, _rx) = dispatcher();
        let reviewed = |reviewed| DomainEvent::LogReviewed {
            log_id: Uuid::new_v4(),
            owner_id: seed::DEVELOPER_ID,
            reviewer_id: seed::MANAGER_ID,
            reviewed,
        };
        dispatcher.dispatch(vec![reviewed(false)]).await;
        assert!(inbox.for_user(seed::DEVELOPER_ID).await.is_empty());

        dispatcher.dispatch(vec![reviewed(true)]).await;
        let own = inbox.for_user(seed::DEVELOPER_ID).await;
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].kind, NotificationKind::Review);
    }

    #[tokio::test]
    async fn test_events_are_broadcast_with_user_id() {
        let (dispatcher, _inbox, mut rx) = dispatcher();
        let log_id = Uuid::new_v4();
        dispatcher
            .dispatch(vec![DomainEvent::LogDeleted {
                log_id,
                owner_id: seed::DEVELOPER_ID,
            }])
            .await;

        let msg: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(msg["type"], "log_deleted");
        assert_eq!(msg["user_id"], seed::DEVELOPER_ID.to_string());
        assert_eq!(msg["log_id"], log_id.to_string());
    }

    #[tokio::test]
    async fn test_submission_is_also_pushed_to_the_manager() {
        let (dispatcher, _inbox, mut rx) = dispatcher();
        dispatcher
            .dispatch(vec![DomainEvent::LogSubmitted {
                log_id: Uuid::new_v4(),
                owner_id: seed::SECOND_DEVELOPER_ID,
                date: today(),
            }])
            .await;

        let first: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        let second: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(first["user_id"], seed::SECOND_DEVELOPER_ID.to_string());
        assert_eq!(second["user_id"], seed::MANAGER_ID.to_string());
    }
}
