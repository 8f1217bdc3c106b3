mod memory;
mod supabase;

pub use memory::InMemoryNotificationStore;
pub use supabase::SupabaseNotificationStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::Notification;

/// Write-once persistence for notifications. There is no update or delete.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification>;

    async fn list_for_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>>;

    async fn get_for_recipient(&self, recipient_id: Uuid, id: Uuid) -> Result<Option<Notification>>;
}
