//! services/api/src/web/meal_plans.rs
//!
//! Weekly meal planning and the calorie summary.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use health_tracker_core::{
    domain::{MealPlanEntry, MealSlot, Weekday},
    meal_plan::{weekly_summary, WeeklySummary},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::recipes::load_recipe;
use crate::web::state::AppState;
use crate::web::{checked_calories, ensure_owner, required_text};

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    /// First day (Monday) of the planning week, `YYYY-MM-DD`.
    pub week_start: NaiveDate,
}

/// A planned meal. With only `recipeId`, the title and calories are copied
/// from the recipe; explicit values win over the recipe's.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealPlanRequest {
    pub week_start: NaiveDate,
    pub day: Weekday,
    pub meal_type: MealSlot,
    #[serde(default)]
    pub recipe_id: Option<Uuid>,
    #[serde(default)]
    pub recipe_title: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
}

/// GET /meal-plans - Entries of one week, in the order they were planned
#[utoipa::path(
    get,
    path = "/meal-plans",
    params(WeekQuery),
    responses(
        (status = 200, description = "Entries of the week", body = [MealPlanEntry]),
        (status = 401, description = "Not logged in")
    ),
    tag = "meal-plans"
)]
pub async fn list_meal_plans_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<MealPlanEntry>>, ApiError> {
    Ok(Json(
        state
            .meal_plans
            .list_meal_plans(user_id, query.week_start)
            .await?,
    ))
}

/// GET /meal-plans/summary - Per-day calories, weekly total and daily average
#[utoipa::path(
    get,
    path = "/meal-plans/summary",
    params(WeekQuery),
    responses(
        (status = 200, description = "Calorie summary of the week", body = WeeklySummary),
        (status = 401, description = "Not logged in")
    ),
    tag = "meal-plans"
)]
pub async fn meal_plan_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeeklySummary>, ApiError> {
    let entries = state
        .meal_plans
        .list_meal_plans(user_id, query.week_start)
        .await?;
    Ok(Json(weekly_summary(&entries)))
}

/// POST /meal-plans - Plan a meal
#[utoipa::path(
    post,
    path = "/meal-plans",
    request_body = CreateMealPlanRequest,
    responses(
        (status = 201, description = "Meal planned", body = MealPlanEntry),
        (status = 400, description = "Neither a recipe nor a title given, or invalid calories"),
        (status = 404, description = "Recipe not found")
    ),
    tag = "meal-plans"
)]
pub async fn create_meal_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateMealPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(calories) = req.calories {
        checked_calories(calories, "calories")?;
    }
    let (recipe_title, calories) = match req.recipe_id {
        Some(recipe_id) => {
            let recipe = load_recipe(&state, user_id, recipe_id).await?;
            let title = match req.recipe_title {
                Some(title) => required_text(&title, "recipeTitle")?,
                None => recipe.title,
            };
            (title, req.calories.or(recipe.calories).unwrap_or(0.0))
        }
        None => {
            let title = req.recipe_title.unwrap_or_default();
            (
                required_text(&title, "recipeTitle")?,
                req.calories.unwrap_or(0.0),
            )
        }
    };

    let entry = MealPlanEntry {
        id: Uuid::new_v4(),
        user_id,
        week_start: req.week_start,
        day: req.day,
        meal_type: req.meal_type,
        recipe_id: req.recipe_id,
        recipe_title,
        calories,
        created_at: Utc::now(),
    };
    let entry = state.meal_plans.create_meal_plan(entry).await?;
    info!(entry_id = %entry.id, %user_id, "Meal planned");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /meal-plans/{id} - Remove a planned meal
#[utoipa::path(
    delete,
    path = "/meal-plans/{id}",
    params(("id" = Uuid, Path, description = "Meal plan entry id")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Entry not found")
    ),
    tag = "meal-plans"
)]
pub async fn delete_meal_plan_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(entry_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let entry = state.meal_plans.get_meal_plan(entry_id).await?;
    ensure_owner(entry.user_id, user_id, "Meal plan entry", entry_id)?;
    state.meal_plans.delete_meal_plan(entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
