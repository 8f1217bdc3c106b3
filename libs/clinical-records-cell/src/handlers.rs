use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::models::{ClinicalRecord, RecordsError};
use crate::services::RecordsService;

impl From<RecordsError> for AppError {
    fn from(e: RecordsError) -> Self {
        let message = e.to_string();
        match e {
            RecordsError::NotFound(_) => AppError::NotFound(message),
            RecordsError::Forbidden(_) => AppError::Forbidden(message),
            RecordsError::InvalidEmail(_) => AppError::BadRequest(message),
            RecordsError::Storage(_) => AppError::Database(message),
        }
    }
}

pub async fn list_records<R: ClinicalRecord>(
    State(service): State<Arc<RecordsService<R>>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, AppError> {
    let records = service.list(&identity).await?;

    Ok(Json(json!({
        "records": records,
        "total": records.len()
    })))
}

pub async fn get_record<R: ClinicalRecord>(
    State(service): State<Arc<RecordsService<R>>>,
    Extension(identity): Extension<Identity>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let record = service.get(&identity, record_id).await?;
    Ok(Json(json!(record)))
}

pub async fn create_record<R: ClinicalRecord>(
    State(service): State<Arc<RecordsService<R>>>,
    Extension(identity): Extension<Identity>,
    Json(draft): Json<R::Draft>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let record = service.create(&identity, draft).await?;
    Ok((StatusCode::CREATED, Json(json!(record))))
}

pub async fn update_record<R: ClinicalRecord>(
    State(service): State<Arc<RecordsService<R>>>,
    Extension(identity): Extension<Identity>,
    Path(record_id): Path<Uuid>,
    Json(draft): Json<R::Draft>,
) -> Result<Json<Value>, AppError> {
    let record = service.update(&identity, record_id, draft).await?;
    Ok(Json(json!(record)))
}

pub async fn delete_record<R: ClinicalRecord>(
    State(service): State<Arc<RecordsService<R>>>,
    Extension(identity): Extension<Identity>,
    Path(record_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete(&identity, record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
