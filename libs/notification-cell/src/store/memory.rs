use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Notification;
use super::NotificationStore;

#[derive(Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn create(&self, notification: &Notification) -> Result<Notification> {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification.clone())
    }

    async fn list_for_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
        let mut found: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        found.sort_by_key(|n| n.created_at);
        Ok(found)
    }

    async fn get_for_recipient(&self, recipient_id: Uuid, id: Uuid) -> Result<Option<Notification>> {
        Ok(self
            .notifications
            .read()
            .await
            .get(&id)
            .filter(|n| n.recipient_id == recipient_id)
            .cloned())
    }
}
