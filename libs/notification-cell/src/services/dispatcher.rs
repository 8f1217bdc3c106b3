use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Notification, NotificationError, NotificationRequest};
use crate::services::email::EmailClient;
use crate::store::NotificationStore;

/// Records a notification and attempts out-of-band delivery.
///
/// Callers treat any error as non-fatal: a mutation that already committed
/// stays committed whatever this returns.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, request: NotificationRequest) -> Result<Notification, NotificationError>;
}

pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    email: Option<EmailClient>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, email: Option<EmailClient>) -> Self {
        Self { store, email }
    }

    pub async fn list_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>, NotificationError> {
        debug!("Listing notifications for {}", recipient_id);
        self.store
            .list_for_recipient(recipient_id)
            .await
            .map_err(|e| NotificationError::Storage(e.to_string()))
    }

    pub async fn get_for(&self, recipient_id: Uuid, id: Uuid) -> Result<Notification, NotificationError> {
        self.store
            .get_for_recipient(recipient_id, id)
            .await
            .map_err(|e| NotificationError::Storage(e.to_string()))?
            .ok_or(NotificationError::NotFound)
    }
}

#[async_trait]
impl NotificationDispatcher for NotificationService {
    async fn notify(&self, request: NotificationRequest) -> Result<Notification, NotificationError> {
        let notification = request.into_notification();

        let stored = self
            .store
            .create(&notification)
            .await
            .map_err(|e| NotificationError::Storage(e.to_string()))?;

        match &self.email {
            Some(email) => {
                // Delivery failure leaves the record in place.
                if let Err(e) = email.send(&stored.recipient_email, &stored.text).await {
                    warn!("Notification {} recorded but not delivered: {}", stored.id, e);
                }
            }
            None => debug!("Email relay not configured, skipping delivery of {}", stored.id),
        }

        info!(
            "Notification {} ({}) recorded for {}",
            stored.id, stored.notification_type, stored.recipient_id
        );
        Ok(stored)
    }
}
