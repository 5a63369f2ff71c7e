//! services/api/src/web/profile.rs
//!
//! Profile endpoints and the derived health metrics.

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use health_tracker_core::{
    domain::{HealthInfo, PersonalInfo, Preferences, Profile},
    metrics::{health_metrics, HealthMetrics},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;

/// The editable parts of a profile. Omitted sections are reset to their defaults.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRequest {
    pub personal_info: PersonalInfo,
    pub health_info: HealthInfo,
    pub preferences: Preferences,
}

async fn load_profile(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    Ok(state
        .profiles
        .get_profile(user_id)
        .await?
        .unwrap_or_else(|| Profile::empty(user_id, Utc::now())))
}

/// GET /profile - The caller's profile, or an empty one if never saved
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The user's profile", body = Profile),
        (status = 401, description = "Not logged in")
    ),
    tag = "profile"
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(load_profile(&state, user_id).await?))
}

/// PUT /profile - Replace the caller's profile
#[utoipa::path(
    put,
    path = "/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = Profile),
        (status = 401, description = "Not logged in")
    ),
    tag = "profile"
)]
pub async fn put_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let existing = load_profile(&state, user_id).await?;
    let profile = Profile {
        user_id,
        personal_info: req.personal_info,
        health_info: req.health_info,
        preferences: req.preferences,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };
    let saved = state.profiles.put_profile(profile).await?;
    info!(%user_id, "Profile updated");
    Ok(Json(saved))
}

/// GET /profile/metrics - BMI, BMR and TDEE computed from the saved profile
#[utoipa::path(
    get,
    path = "/profile/metrics",
    responses(
        (status = 200, description = "Derived health metrics", body = HealthMetrics),
        (status = 401, description = "Not logged in")
    ),
    tag = "profile"
)]
pub async fn get_metrics_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<HealthMetrics>, ApiError> {
    let profile = load_profile(&state, user_id).await?;
    Ok(Json(health_metrics(&profile.personal_info)))
}
