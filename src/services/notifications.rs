use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::notification::Notification;

/// Entries kept per recipient; older ones are evicted first.
pub const DEFAULT_PER_USER_LIMIT: usize = 100;

/// In-process notification inbox shared by the dispatcher and handlers.
#[derive(Clone)]
pub struct NotificationStore {
    entries: Arc<RwLock<Vec<Notification>>>,
    per_user_limit: usize,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PER_USER_LIMIT)
    }
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(per_user_limit: usize) -> Self {
        Self {
            entries: Arc::default(),
            per_user_limit,
        }
    }

    /// Appends in arrival order and trims the recipient's inbox to the limit.
    pub async fn push(&self, notification: Notification) {
        let user_id = notification.user_id;
        let mut entries = self.entries.write().await;
        entries.push(notification);

        let own = entries.iter().filter(|n| n.user_id == user_id).count();
        let mut excess = own.saturating_sub(self.per_user_limit);
        if excess > 0 {
            entries.retain(|n| {
                if excess > 0 && n.user_id == user_id {
                    excess -= 1;
                    false
                } else {
                    true
                }
            });
            tracing::debug!(user_id = %user_id, "Notification inbox trimmed");
        }
    }

    /// Newest first.
    pub async fn for_user(&self, user_id: Uuid) -> Vec<Notification> {
        let mut own: Vec<Notification> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        own
    }

    /// Marks the notification read if it belongs to `user_id`.
    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Option<Notification> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)?;
        entry.read = true;
        Some(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationKind;

    #[tokio::test]
    async fn test_notifications_are_scoped_to_recipient() {
        let inbox = NotificationStore::new();
        let ann = Uuid::new_v4();
        let ben = Uuid::new_v4();
        inbox.push(Notification::new(ann, "hello", NotificationKind::System)).await;
        inbox.push(Notification::new(ben, "hey", NotificationKind::Reminder)).await;

        let own = inbox.for_user(ann).await;
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].message, "hello");
    }

    #[tokio::test]
    async fn test_mark_read_requires_ownership() {
        let inbox = NotificationStore::new();
        let ann = Uuid::new_v4();
        let note = Notification::new(ann, "hello", NotificationKind::Review);
        let id = note.id;
        inbox.push(note).await;

        assert!(inbox.mark_read(Uuid::new_v4(), id).await.is_none());
        assert!(inbox.mark_read(ann, id).await.unwrap().read);
    }

    #[tokio::test]
    async fn test_inbox_keeps_only_newest_per_user() {
        let inbox = NotificationStore::with_limit(2);
        let ann = Uuid::new_v4();
        let ben = Uuid::new_v4();
        inbox.push(Notification::new(ben, "ben-1", NotificationKind::System)).await;
        for i in 1..=3 {
            inbox
                .push(Notification::new(ann, format!("ann-{i}"), NotificationKind::Reminder))
                .await;
        }

        let mut kept: Vec<String> = inbox
            .for_user(ann)
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        kept.sort();
        assert_eq!(kept, vec!["ann-2", "ann-3"]);
        assert_eq!(inbox.for_user(ben).await.len(), 1);
    }
}
