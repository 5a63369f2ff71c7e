//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how it is
//! rendered as an HTTP response.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use health_tracker_core::{goals::GoalError, ports::PortError, rollback::RollbackError};
use serde_json::json;
use tracing::{error, warn};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A goal business rule refused the change. The goal was not modified.
    #[error("{0}")]
    Goal(#[from] GoalError),

    /// The request body or query was missing a field or had an invalid value.
    #[error("{0}")]
    Validation(String),

    /// The chat responder could not produce a reply. Carries the user-facing text.
    #[error("{0}")]
    Upstream(String),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure to apply the embedded database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<RollbackError<GoalError>> for ApiError {
    fn from(err: RollbackError<GoalError>) -> Self {
        match err {
            RollbackError::Rejected(e) => ApiError::Goal(e),
            RollbackError::Persist(e) => ApiError::Port(e),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Port(PortError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Port(PortError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Port(PortError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Goal(GoalError::ProgressIncomplete { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Goal(GoalError::BlankMilestoneTitle)
            | ApiError::Goal(GoalError::DuplicateMilestone(_)) => StatusCode::BAD_REQUEST,
            ApiError::Goal(GoalError::MilestoneNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Client-facing errors carry their own message; server-side details
        // are logged and replaced with a generic one.
        let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            error!("Request failed: {:?}", self);
            "An internal error occurred. Please try again later.".to_string()
        } else {
            warn!("Request rejected ({}): {}", status, self);
            match &self {
                ApiError::Port(PortError::Unauthorized) => "Unauthorized".to_string(),
                ApiError::Port(PortError::NotFound(what)) => what.clone(),
                ApiError::Port(PortError::Conflict(what)) => what.clone(),
                other => other.to_string(),
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
