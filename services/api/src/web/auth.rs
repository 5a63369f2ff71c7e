//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use health_tracker_core::{
    domain::{Gender, User, UserCredentials},
    ports::PortError,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::{session_id_from_headers, SESSION_COOKIE};
use crate::web::state::AppState;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Every field is optional at the JSON level so that a missing one is
/// reported as a 400 with a readable message.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

fn normalized_email(email: Option<String>) -> Result<String, ApiError> {
    let email = required(email, "email")?.to_lowercase();
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    Ok(email)
}

fn session_cookie(auth_session_id: &str, days: i64) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        auth_session_id,
        Duration::days(days).num_seconds()
    )
}

/// Creates a fresh auth session for `user_id` and returns its cookie.
async fn start_session(state: &AppState, user_id: Uuid) -> Result<String, ApiError> {
    let auth_session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(state.config.session_days);
    state
        .users
        .create_auth_session(&auth_session_id, user_id, expires_at)
        .await?;
    Ok(session_cookie(&auth_session_id, state.config.session_days))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Missing field or invalid email"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the payload
    let name = required(req.name, "name")?;
    let email = normalized_email(req.email)?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("password is required".to_string()))?;
    let age = req
        .age
        .filter(|a| *a > 0)
        .ok_or_else(|| ApiError::Validation("age is required".to_string()))?;
    let gender = req
        .gender
        .ok_or_else(|| ApiError::Validation("gender is required".to_string()))?;

    // 2. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let hashed_password = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })?
        .to_string();

    // 3. Store the user, rejecting a taken email
    let user = state
        .users
        .create_user(UserCredentials {
            user: User {
                user_id: Uuid::new_v4(),
                name,
                email,
                age,
                gender: Some(gender),
            },
            hashed_password,
        })
        .await?;
    info!(user_id = %user.user_id, "Registered new user");

    // 4. Log the new user straight in
    let cookie = start_session(&state, user.user_id).await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse { user }),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing field or invalid email"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = normalized_email(req.email)?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("password is required".to_string()))?;

    // 1. Get user by email. An unknown email looks exactly like a bad password.
    let credentials = state.users.get_user_by_email(&email).await.map_err(|e| match e {
        PortError::NotFound(_) => ApiError::Port(PortError::Unauthorized),
        other => ApiError::Port(other),
    })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&credentials.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ApiError::Internal("Stored password hash is unreadable".to_string())
    })?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(ApiError::Port(PortError::Unauthorized));
    }

    // 3. Start a session
    let cookie = start_session(&state, credentials.user.user_id).await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: credentials.user,
        }),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let auth_session_id =
        session_id_from_headers(&headers).ok_or(ApiError::Port(PortError::Unauthorized))?;

    state.users.delete_auth_session(auth_session_id).await?;

    Ok((StatusCode::OK, [(header::SET_COOKIE, session_cookie("", 0))]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_accepts_plain_addresses_only() {
        assert!(EMAIL_PATTERN.is_match("ana@example.com"));
        assert!(!EMAIL_PATTERN.is_match("ana@example"));
        assert!(!EMAIL_PATTERN.is_match("ana example@x.com"));
        assert!(!EMAIL_PATTERN.is_match("@example.com"));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = normalized_email(Some("  Ana@Example.COM ".to_string())).unwrap();
        assert_eq!(email, "ana@example.com");
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        assert_eq!(
            session_cookie("", 0),
            "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0"
        );
    }
}
