//! services/api/src/web/recipes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use health_tracker_core::domain::Recipe;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::{checked_calories, ensure_owner, required_text};

/// Used for both create and update; an update replaces every field.
#[derive(Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub calories: Option<f64>,
}

impl RecipeRequest {
    fn apply_to(self, recipe: &mut Recipe) -> Result<(), ApiError> {
        recipe.title = required_text(&self.title, "title")?;
        recipe.description = self.description;
        recipe.categories = self.categories;
        recipe.image = self.image.filter(|i| !i.trim().is_empty());
        recipe.ingredients = self.ingredients;
        recipe.steps = self.steps;
        recipe.calories = self
            .calories
            .map(|c| checked_calories(c, "calories"))
            .transpose()?;
        Ok(())
    }
}

/// Fetches a recipe, hiding other users' recipes as missing.
pub(crate) async fn load_recipe(state: &AppState, user_id: Uuid, recipe_id: Uuid) -> Result<Recipe, ApiError> {
    let recipe = state.recipes.get_recipe(recipe_id).await?;
    ensure_owner(recipe.user_id, user_id, "Recipe", recipe_id)?;
    Ok(recipe)
}

/// GET /recipes - The caller's recipes, newest first
#[utoipa::path(
    get,
    path = "/recipes",
    responses(
        (status = 200, description = "List of recipes", body = [Recipe]),
        (status = 401, description = "Not logged in")
    ),
    tag = "recipes"
)]
pub async fn list_recipes_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(state.recipes.list_recipes(user_id).await?))
}

/// POST /recipes - Create a recipe
#[utoipa::path(
    post,
    path = "/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Blank title or invalid calories")
    ),
    tag = "recipes"
)]
pub async fn create_recipe_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<RecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();
    let mut recipe = Recipe {
        id: Uuid::new_v4(),
        user_id,
        title: String::new(),
        description: String::new(),
        categories: Vec::new(),
        image: None,
        ingredients: Vec::new(),
        steps: Vec::new(),
        calories: None,
        created_at: now,
        updated_at: now,
    };
    req.apply_to(&mut recipe)?;
    let recipe = state.recipes.create_recipe(recipe).await?;
    info!(recipe_id = %recipe.id, %user_id, "Recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /recipes/{id} - Replace a recipe
#[utoipa::path(
    put,
    path = "/recipes/{id}",
    params(("id" = Uuid, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = Recipe),
        (status = 404, description = "Recipe not found")
    ),
    tag = "recipes"
)]
pub async fn update_recipe_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(recipe_id): Path<Uuid>,
    Json(req): Json<RecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let mut recipe = load_recipe(&state, user_id, recipe_id).await?;
    req.apply_to(&mut recipe)?;
    recipe.updated_at = Utc::now();
    Ok(Json(state.recipes.update_recipe(recipe).await?))
}

/// DELETE /recipes/{id} - Delete a recipe
///
/// Meal-plan entries keep their copied title and calories.
#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    params(("id" = Uuid, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 404, description = "Recipe not found")
    ),
    tag = "recipes"
)]
pub async fn delete_recipe_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_recipe(&state, user_id, recipe_id).await?;
    state.recipes.delete_recipe(recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
