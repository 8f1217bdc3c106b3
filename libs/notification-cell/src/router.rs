use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::NotificationService;

pub fn notification_routes(config: Arc<AppConfig>, service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/{notification_id}", get(handlers::get_notification))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
