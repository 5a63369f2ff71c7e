//! services/api/src/web/progress.rs
//!
//! Dated body-measurement records.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use health_tracker_core::domain::{Measurements, ProgressRecord};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::ensure_owner;
use crate::web::state::AppState;

/// Used for both create and update; an update replaces every field.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default)]
    pub body_fat: Option<f64>,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProgressRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(ApiError::Validation("weight must be a positive number".to_string()));
        }
        if let Some(body_fat) = self.body_fat {
            if !(0.0..=100.0).contains(&body_fat) {
                return Err(ApiError::Validation(
                    "bodyFat must be a percentage between 0 and 100".to_string(),
                ));
            }
        }
        Ok(())
    }
}

async fn load_record(
    state: &AppState,
    user_id: Uuid,
    record_id: Uuid,
) -> Result<ProgressRecord, ApiError> {
    let record = state.progress.get_progress(record_id).await?;
    ensure_owner(record.user_id, user_id, "Progress record", record_id)?;
    Ok(record)
}

/// GET /progress - The caller's records, latest date first
#[utoipa::path(
    get,
    path = "/progress",
    responses(
        (status = 200, description = "List of progress records", body = [ProgressRecord]),
        (status = 401, description = "Not logged in")
    ),
    tag = "progress"
)]
pub async fn list_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<ProgressRecord>>, ApiError> {
    Ok(Json(state.progress.list_progress(user_id).await?))
}

/// POST /progress - Record a measurement
#[utoipa::path(
    post,
    path = "/progress",
    request_body = ProgressRequest,
    responses(
        (status = 201, description = "Record created", body = ProgressRecord),
        (status = 400, description = "Invalid weight or body fat")
    ),
    tag = "progress"
)]
pub async fn create_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<ProgressRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let now = Utc::now();
    let record = ProgressRecord {
        id: Uuid::new_v4(),
        user_id,
        date: req.date,
        weight: req.weight,
        body_fat: req.body_fat,
        measurements: req.measurements,
        notes: req.notes.filter(|n| !n.trim().is_empty()),
        created_at: now,
        updated_at: now,
    };
    let record = state.progress.create_progress(record).await?;
    info!(record_id = %record.id, %user_id, "Progress recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /progress/{id} - Replace a record
#[utoipa::path(
    put,
    path = "/progress/{id}",
    params(("id" = Uuid, Path, description = "Progress record id")),
    request_body = ProgressRequest,
    responses(
        (status = 200, description = "Record updated", body = ProgressRecord),
        (status = 400, description = "Invalid weight or body fat"),
        (status = 404, description = "Record not found")
    ),
    tag = "progress"
)]
pub async fn update_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(record_id): Path<Uuid>,
    Json(req): Json<ProgressRequest>,
) -> Result<Json<ProgressRecord>, ApiError> {
    req.validate()?;
    let mut record = load_record(&state, user_id, record_id).await?;
    record.date = req.date;
    record.weight = req.weight;
    record.body_fat = req.body_fat;
    record.measurements = req.measurements;
    record.notes = req.notes.filter(|n| !n.trim().is_empty());
    record.updated_at = Utc::now();
    Ok(Json(state.progress.update_progress(record).await?))
}

/// DELETE /progress/{id} - Delete a record
#[utoipa::path(
    delete,
    path = "/progress/{id}",
    params(("id" = Uuid, Path, description = "Progress record id")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found")
    ),
    tag = "progress"
)]
pub async fn delete_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(record_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_record(&state, user_id, record_id).await?;
    state.progress.delete_progress(record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
