use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use uuid::Uuid;

use shared_database::SupabaseClient;

use crate::models::Notification;
use super::NotificationStore;

const TABLE: &str = "/rest/v1/notifications";

pub struct SupabaseNotificationStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseNotificationStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl NotificationStore for SupabaseNotificationStore {
    async fn create(&self, notification: &Notification) -> Result<Notification> {
        let body = json!({
            "id": notification.id,
            "type": notification.notification_type,
            "recipient_id": notification.recipient_id,
            "recipient_email": notification.recipient_email,
            "text": notification.text,
            "created_at": notification.created_at.to_rfc3339(),
        });

        let mut rows: Vec<Notification> = self
            .supabase
            .request_returning(Method::POST, TABLE, Some(body))
            .await?;

        rows.pop().ok_or_else(|| anyhow!("Notification insert returned no rows"))
    }

    async fn list_for_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
        let path = format!("{}?recipient_id=eq.{}&order=created_at.asc", TABLE, recipient_id);
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn get_for_recipient(&self, recipient_id: Uuid, id: Uuid) -> Result<Option<Notification>> {
        let path = format!("{}?id=eq.{}&recipient_id=eq.{}", TABLE, id, recipient_id);
        let mut rows: Vec<Notification> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.pop())
    }
}
