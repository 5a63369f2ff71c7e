//! services/api/src/web/goals.rs
//!
//! Goal endpoints. Every mutation of an existing goal goes through
//! `apply_then_persist`, so a rejected rule or a failed write leaves the
//! stored goal and the response consistent.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use health_tracker_core::{
    domain::{Goal, GoalPatch, GoalType},
    goals::GoalError,
    ports::GoalStore,
    rollback::apply_then_persist,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::{ensure_owner, required_text};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub unit: String,
    pub deadline: NaiveDate,
    /// Titles of the initial milestones.
    #[serde(default)]
    pub milestones: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct MilestoneRequest {
    pub title: String,
}

#[derive(Deserialize, IntoParams)]
pub struct GoalQuery {
    /// Only return goals of this type.
    #[serde(rename = "type")]
    pub goal_type: Option<GoalType>,
}

/// A goal together with the values the client displays next to it.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: u8,
    pub milestones_completed: usize,
    pub milestones_total: usize,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        let progress = goal.progress_percent();
        let (milestones_completed, milestones_total) = goal.milestone_fraction();
        Self {
            goal,
            progress,
            milestones_completed,
            milestones_total,
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

async fn load_goal(state: &AppState, user_id: Uuid, goal_id: Uuid) -> Result<Goal, ApiError> {
    let goal = state.goals.get_goal(goal_id).await?;
    ensure_owner(goal.user_id, user_id, "Goal", goal_id)?;
    Ok(goal)
}

/// Loads the caller's goal, applies `change` and stores the result.
///
/// `updated_at` is bumped only when the change is accepted.
async fn mutate_goal<R, F>(
    state: &AppState,
    user_id: Uuid,
    goal_id: Uuid,
    change: F,
) -> Result<(Goal, R), ApiError>
where
    F: FnOnce(&mut Goal) -> Result<R, GoalError>,
{
    let mut goal = load_goal(state, user_id, goal_id).await?;
    let store: Arc<dyn GoalStore> = state.goals.clone();
    let outcome = apply_then_persist(
        &mut goal,
        |g: &mut Goal| -> Result<R, GoalError> {
            let outcome = change(g)?;
            g.updated_at = Utc::now();
            Ok(outcome)
        },
        |tentative| async move { store.update_goal(tentative).await.map(|_| ()) },
    )
    .await?;
    Ok((goal, outcome))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /goals - The caller's goals, most recently updated first
#[utoipa::path(
    get,
    path = "/goals",
    params(GoalQuery),
    responses(
        (status = 200, description = "List of goals", body = [GoalView]),
        (status = 401, description = "Not logged in")
    ),
    tag = "goals"
)]
pub async fn list_goals_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<GoalQuery>,
) -> Result<Json<Vec<GoalView>>, ApiError> {
    let goals = state.goals.list_goals(user_id, query.goal_type).await?;
    Ok(Json(goals.into_iter().map(GoalView::from).collect()))
}

/// POST /goals - Create a goal
#[utoipa::path(
    post,
    path = "/goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalView),
        (status = 400, description = "Blank title or milestone title"),
        (status = 401, description = "Not logged in")
    ),
    tag = "goals"
)]
pub async fn create_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = required_text(&req.title, "title")?;
    let now = Utc::now();
    let mut goal = Goal {
        id: Uuid::new_v4(),
        user_id,
        title,
        description: req.description,
        goal_type: req.goal_type,
        target_value: req.target_value,
        current_value: req.current_value,
        unit: req.unit,
        deadline: req.deadline,
        milestones: Vec::new(),
        completed: false,
        created_at: now,
        updated_at: now,
    };
    for milestone in &req.milestones {
        goal.add_milestone(milestone)?;
    }

    let goal = state.goals.create_goal(goal).await?;
    info!(goal_id = %goal.id, %user_id, "Goal created");
    Ok((StatusCode::CREATED, Json(GoalView::from(goal))))
}

/// GET /goals/{id} - A single goal
#[utoipa::path(
    get,
    path = "/goals/{id}",
    params(("id" = Uuid, Path, description = "Goal id")),
    responses(
        (status = 200, description = "The goal", body = GoalView),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn get_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<GoalView>, ApiError> {
    Ok(Json(load_goal(&state, user_id, goal_id).await?.into()))
}

/// PUT /goals/{id} - Partially update a goal
///
/// Setting `completed` to true is refused with 422 unless progress,
/// evaluated against the patched values, is 100%.
#[utoipa::path(
    put,
    path = "/goals/{id}",
    params(("id" = Uuid, Path, description = "Goal id")),
    request_body = GoalPatch,
    responses(
        (status = 200, description = "Goal updated", body = GoalView),
        (status = 404, description = "Goal not found"),
        (status = 422, description = "Progress incomplete")
    ),
    tag = "goals"
)]
pub async fn update_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
    Json(patch): Json<GoalPatch>,
) -> Result<Json<GoalView>, ApiError> {
    if let Some(title) = &patch.title {
        required_text(title, "title")?;
    }
    let (goal, ()) = mutate_goal(&state, user_id, goal_id, |g| g.apply_patch(patch)).await?;
    Ok(Json(goal.into()))
}

/// DELETE /goals/{id} - Delete a goal and its milestones
#[utoipa::path(
    delete,
    path = "/goals/{id}",
    params(("id" = Uuid, Path, description = "Goal id")),
    responses(
        (status = 204, description = "Goal deleted"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn delete_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_goal(&state, user_id, goal_id).await?;
    state.goals.delete_goal(goal_id).await?;
    info!(%goal_id, "Goal deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /goals/{id}/toggle - Flip the completion flag
///
/// Completing requires 100% progress. The new state is copied to every milestone.
#[utoipa::path(
    post,
    path = "/goals/{id}/toggle",
    params(("id" = Uuid, Path, description = "Goal id")),
    responses(
        (status = 200, description = "Completion toggled", body = GoalView),
        (status = 404, description = "Goal not found"),
        (status = 422, description = "Progress incomplete")
    ),
    tag = "goals"
)]
pub async fn toggle_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<GoalView>, ApiError> {
    let (goal, completed) =
        mutate_goal(&state, user_id, goal_id, |g| g.toggle_completed()).await?;
    info!(%goal_id, completed, "Goal completion toggled");
    Ok(Json(goal.into()))
}

/// POST /goals/{id}/milestones - Append a milestone
#[utoipa::path(
    post,
    path = "/goals/{id}/milestones",
    params(("id" = Uuid, Path, description = "Goal id")),
    request_body = MilestoneRequest,
    responses(
        (status = 201, description = "Milestone added", body = GoalView),
        (status = 400, description = "Blank title"),
        (status = 404, description = "Goal not found")
    ),
    tag = "goals"
)]
pub async fn add_milestone_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(goal_id): Path<Uuid>,
    Json(req): Json<MilestoneRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (goal, milestone_id) = mutate_goal(&state, user_id, goal_id, |g| {
        g.add_milestone(&req.title).map(|m| m.id)
    })
    .await?;
    info!(%goal_id, %milestone_id, "Milestone added");
    Ok((StatusCode::CREATED, Json(GoalView::from(goal))))
}

/// POST /goals/{id}/milestones/{mid}/toggle - Flip one milestone
#[utoipa::path(
    post,
    path = "/goals/{id}/milestones/{mid}/toggle",
    params(
        ("id" = Uuid, Path, description = "Goal id"),
        ("mid" = Uuid, Path, description = "Milestone id")
    ),
    responses(
        (status = 200, description = "Milestone toggled", body = GoalView),
        (status = 404, description = "Goal or milestone not found")
    ),
    tag = "goals"
)]
pub async fn toggle_milestone_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((goal_id, milestone_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GoalView>, ApiError> {
    let (goal, _) =
        mutate_goal(&state, user_id, goal_id, |g| g.toggle_milestone(milestone_id)).await?;
    Ok(Json(goal.into()))
}

/// DELETE /goals/{id}/milestones/{mid} - Remove one milestone
#[utoipa::path(
    delete,
    path = "/goals/{id}/milestones/{mid}",
    params(
        ("id" = Uuid, Path, description = "Goal id"),
        ("mid" = Uuid, Path, description = "Milestone id")
    ),
    responses(
        (status = 200, description = "Milestone removed", body = GoalView),
        (status = 404, description = "Goal or milestone not found")
    ),
    tag = "goals"
)]
pub async fn delete_milestone_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path((goal_id, milestone_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GoalView>, ApiError> {
    let (goal, _) =
        mutate_goal(&state, user_id, goal_id, |g| g.remove_milestone(milestone_id)).await?;
    Ok(Json(goal.into()))
}
