use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const EMAIL_SUBJECT: &str = "New doctor appointment!";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationType {
    Create,
    Change,
    Cancel,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::Create => write!(f, "Create"),
            NotificationType::Change => write!(f, "Change"),
            NotificationType::Cancel => write!(f, "Cancel"),
        }
    }
}

/// Append-only record of a message sent to one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub recipient_id: Uuid,
    pub recipient_email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub recipient_id: Uuid,
    pub recipient_email: String,
    pub notification_type: NotificationType,
    pub text: String,
}

impl NotificationRequest {
    pub fn new(
        recipient_id: Uuid,
        recipient_email: impl Into<String>,
        notification_type: NotificationType,
        text: impl Into<String>,
    ) -> Self {
        Self {
            recipient_id,
            recipient_email: recipient_email.into(),
            notification_type,
            text: text.into(),
        }
    }

    pub fn into_notification(self) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            notification_type: self.notification_type,
            recipient_id: self.recipient_id,
            recipient_email: self.recipient_email,
            text: self.text,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error("Failed to record notification: {0}")]
    Storage(String),

    #[error("Email delivery failed: {0}")]
    Delivery(String),
}
