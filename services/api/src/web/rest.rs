//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification and the liveness
//! endpoint.

use axum::response::Json;
use health_tracker_core::{
    domain::{
        ActivityLevel, ChatMessage, ChatRole, Gender, Goal, GoalPatch, GoalType, HealthInfo,
        MealPlanEntry, MealSlot, Measurements, Milestone, Note, PersonalInfo, Preferences, Profile,
        ProgressRecord, Recipe, User, Weekday,
    },
    meal_plan::{DaySummary, WeeklySummary},
    metrics::{BmiCategory, HealthMetrics},
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::{auth, chat, goals, meal_plans, notes, profile, progress, recipes};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        profile::get_profile_handler,
        profile::put_profile_handler,
        profile::get_metrics_handler,
        goals::list_goals_handler,
        goals::create_goal_handler,
        goals::get_goal_handler,
        goals::update_goal_handler,
        goals::delete_goal_handler,
        goals::toggle_goal_handler,
        goals::add_milestone_handler,
        goals::toggle_milestone_handler,
        goals::delete_milestone_handler,
        notes::list_notes_handler,
        notes::create_note_handler,
        notes::update_note_handler,
        notes::delete_note_handler,
        recipes::list_recipes_handler,
        recipes::create_recipe_handler,
        recipes::update_recipe_handler,
        recipes::delete_recipe_handler,
        progress::list_progress_handler,
        progress::create_progress_handler,
        progress::update_progress_handler,
        progress::delete_progress_handler,
        meal_plans::list_meal_plans_handler,
        meal_plans::meal_plan_summary_handler,
        meal_plans::create_meal_plan_handler,
        meal_plans::delete_meal_plan_handler,
        chat::list_chat_handler,
        chat::post_chat_handler,
    ),
    components(
        schemas(
            HealthResponse,
            auth::RegisterRequest, auth::LoginRequest, auth::AuthResponse, User, Gender,
            profile::ProfileRequest, Profile, PersonalInfo, HealthInfo, Preferences, ActivityLevel,
            HealthMetrics, BmiCategory,
            goals::CreateGoalRequest, goals::MilestoneRequest, goals::GoalView, Goal, GoalPatch,
            GoalType, Milestone,
            notes::CreateNoteRequest, notes::UpdateNoteRequest, Note,
            recipes::RecipeRequest, Recipe,
            progress::ProgressRequest, ProgressRecord, Measurements,
            meal_plans::CreateMealPlanRequest, MealPlanEntry, Weekday, MealSlot, WeeklySummary,
            DaySummary,
            chat::ChatRequest, chat::ChatExchange, ChatMessage, ChatRole,
        )
    ),
    tags(
        (name = "auth", description = "Registration and cookie sessions."),
        (name = "profile", description = "Personal data and derived BMI, BMR and TDEE."),
        (name = "goals", description = "Goals, milestones and the completion guard."),
        (name = "notes", description = "Free-form notes with tags."),
        (name = "recipes", description = "The user's recipe book."),
        (name = "progress", description = "Body measurements over time."),
        (name = "meal-plans", description = "Weekly meal planning and calorie totals."),
        (name = "chat", description = "Conversation with the health assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Liveness
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
