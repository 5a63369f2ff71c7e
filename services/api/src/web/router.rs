//! services/api/src/web/router.rs
//!
//! Assembles the public and protected routes into the application router.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ConfigError;
use crate::error::ApiError;
use crate::web::{
    auth, chat, goals, meal_plans, middleware::require_auth, notes, profile, progress, recipes,
    rest::{health_handler, ApiDoc},
    state::AppState,
};

const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Builds the complete application: API routes, CORS, and the Swagger UI.
pub fn build_router(state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = state.config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/profile",
            get(profile::get_profile_handler).put(profile::put_profile_handler),
        )
        .route("/profile/metrics", get(profile::get_metrics_handler))
        .route(
            "/goals",
            get(goals::list_goals_handler).post(goals::create_goal_handler),
        )
        .route(
            "/goals/{id}",
            get(goals::get_goal_handler)
                .put(goals::update_goal_handler)
                .delete(goals::delete_goal_handler),
        )
        .route("/goals/{id}/toggle", post(goals::toggle_goal_handler))
        .route("/goals/{id}/milestones", post(goals::add_milestone_handler))
        .route(
            "/goals/{id}/milestones/{mid}",
            delete(goals::delete_milestone_handler),
        )
        .route(
            "/goals/{id}/milestones/{mid}/toggle",
            post(goals::toggle_milestone_handler),
        )
        .route(
            "/notes",
            get(notes::list_notes_handler).post(notes::create_note_handler),
        )
        .route(
            "/notes/{id}",
            put(notes::update_note_handler).delete(notes::delete_note_handler),
        )
        .route(
            "/recipes",
            get(recipes::list_recipes_handler).post(recipes::create_recipe_handler),
        )
        .route(
            "/recipes/{id}",
            put(recipes::update_recipe_handler)
                .delete(recipes::delete_recipe_handler),
        )
        .route(
            "/progress",
            get(progress::list_progress_handler).post(progress::create_progress_handler),
        )
        .route(
            "/progress/{id}",
            put(progress::update_progress_handler)
                .delete(progress::delete_progress_handler),
        )
        .route(
            "/meal-plans",
            get(meal_plans::list_meal_plans_handler).post(meal_plans::create_meal_plan_handler),
        )
        .route(
            "/meal-plans/summary",
            get(meal_plans::meal_plan_summary_handler),
        )
        .route(
            "/meal-plans/{id}",
            delete(meal_plans::delete_meal_plan_handler),
        )
        .route(
            "/chat",
            get(chat::list_chat_handler).post(chat::post_chat_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}
