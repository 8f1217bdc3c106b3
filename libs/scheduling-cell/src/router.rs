use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::booking::BookingService;

pub fn schedule_routes(config: Arc<AppConfig>, booking: Arc<BookingService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_schedules).post(handlers::create_schedule))
        .route(
            "/{schedule_id}",
            get(handlers::get_schedule)
                .put(handlers::update_schedule)
                .delete(handlers::delete_schedule),
        )
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(booking)
}

pub fn appointment_routes(config: Arc<AppConfig>, booking: Arc<BookingService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::create_appointment))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::cancel_appointment),
        )
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(booking)
}
