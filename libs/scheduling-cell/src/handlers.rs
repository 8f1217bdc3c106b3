use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::models::{AppointmentRequest, AvailabilityWindowRequest, ScheduleQuery, SchedulingError};
use crate::services::booking::BookingService;

impl From<SchedulingError> for AppError {
    fn from(e: SchedulingError) -> Self {
        let message = e.to_string();
        match e {
            SchedulingError::InvalidInterval | SchedulingError::InvalidEmail(_) => AppError::BadRequest(message),
            SchedulingError::NoAvailability => AppError::Unprocessable(message),
            SchedulingError::TimeConflict | SchedulingError::WindowInUse => AppError::Conflict(message),
            SchedulingError::NotFound(_) => AppError::NotFound(message),
            SchedulingError::Forbidden(_) => AppError::Forbidden(message),
            SchedulingError::StorageError(_) => AppError::Database(message),
        }
    }
}

// ==============================================================================
// SCHEDULE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_schedules(
    State(booking): State<Arc<BookingService>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Value>, AppError> {
    let schedules = booking.list_availability_windows(query.doctor_id).await?;

    Ok(Json(json!({
        "schedules": schedules,
        "total": schedules.len()
    })))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(booking): State<Arc<BookingService>>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let schedule = booking.get_availability_window(schedule_id).await?;
    Ok(Json(json!(schedule)))
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<AvailabilityWindowRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let schedule = booking
        .create_availability_window(&identity, request.interval())
        .await?;

    Ok((StatusCode::CREATED, Json(json!(schedule))))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<AvailabilityWindowRequest>,
) -> Result<Json<Value>, AppError> {
    let schedule = booking
        .update_availability_window(&identity, schedule_id, request.interval())
        .await?;

    Ok(Json(json!(schedule)))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
    Path(schedule_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    booking.delete_availability_window(&identity, schedule_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking.list_appointments(&identity).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = booking.get_appointment(&identity, appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = booking.create_appointment(&identity, request).await?;
    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<AppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = booking
        .update_appointment(&identity, appointment_id, request)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(booking): State<Arc<BookingService>>,
    Extension(identity): Extension<Identity>,
    Path(appointment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    booking.cancel_appointment(&identity, appointment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
