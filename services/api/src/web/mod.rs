pub mod auth;
pub mod chat;
pub mod goals;
pub mod meal_plans;
pub mod middleware;
pub mod notes;
pub mod profile;
pub mod progress;
pub mod recipes;
pub mod rest;
pub mod router;
pub mod state;

pub use middleware::require_auth;
pub use router::build_router;

use crate::error::ApiError;
use health_tracker_core::ports::PortError;
use uuid::Uuid;

/// Records belonging to another user are reported as missing, never as forbidden.
pub(crate) fn ensure_owner(owner: Uuid, user_id: Uuid, what: &str, id: Uuid) -> Result<(), ApiError> {
    if owner == user_id {
        Ok(())
    } else {
        Err(ApiError::Port(PortError::NotFound(format!("{} {} not found", what, id))))
    }
}

/// Trims a required text field, rejecting it when blank.
pub(crate) fn required_text(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Accepts any finite, non-negative calorie amount, fractions included.
pub(crate) fn checked_calories(value: f64, field: &str) -> Result<f64, ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(value)
}
