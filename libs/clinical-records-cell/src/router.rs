use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::models::ClinicalRecord;
use crate::services::RecordsService;

/// Routes for one record kind, mounted e.g. at `/api/prescriptions`.
pub fn record_routes<R: ClinicalRecord>(config: Arc<AppConfig>, service: Arc<RecordsService<R>>) -> Router {
    Router::new()
        .route("/", get(handlers::list_records::<R>).post(handlers::create_record::<R>))
        .route(
            "/{record_id}",
            get(handlers::get_record::<R>)
                .put(handlers::update_record::<R>)
                .delete(handlers::delete_record::<R>),
        )
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(service)
}
