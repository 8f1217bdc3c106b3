use reqwest::Client;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{EmailMessage, NotificationError, EMAIL_SUBJECT};

/// Client for the outbound HTTP mail relay.
pub struct EmailClient {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl EmailClient {
    /// Returns `None` when no relay is configured; callers then skip delivery.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        if !config.is_email_configured() {
            return None;
        }

        Some(Self {
            client: Client::new(),
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        })
    }

    pub async fn send(&self, to: &str, body: &str) -> Result<(), NotificationError> {
        let message = EmailMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject: EMAIL_SUBJECT.to_string(),
            html: body.to_string(),
        };

        debug!("Sending notification email to {}", to);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&message)
            .send()
            .await
            .map_err(|e| NotificationError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Mail relay rejected message: {} - {}", status, text);
            return Err(NotificationError::Delivery(format!("HTTP {}: {}", status, text)));
        }

        Ok(())
    }
}
