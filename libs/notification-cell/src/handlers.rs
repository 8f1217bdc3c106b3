use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::models::NotificationError;
use crate::services::NotificationService;

impl From<NotificationError> for AppError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::NotFound => AppError::NotFound("Notification not found".to_string()),
            NotificationError::Storage(msg) => AppError::Database(msg),
            NotificationError::Delivery(msg) => AppError::Internal(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_notifications(
    State(service): State<Arc<NotificationService>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, AppError> {
    let notifications = service.list_for(identity.id).await?;

    Ok(Json(json!({
        "notifications": notifications,
        "total": notifications.len()
    })))
}

#[axum::debug_handler]
pub async fn get_notification(
    State(service): State<Arc<NotificationService>>,
    Extension(identity): Extension<Identity>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let notification = service.get_for(identity.id, notification_id).await?;
    Ok(Json(json!(notification)))
}
