//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use health_tracker_core::ports::PortError;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::web::state::AppState;

/// Name of the cookie that carries the auth session id.
pub const SESSION_COOKIE: &str = "session";

/// Extracts the auth session id from the `Cookie` header, if any.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

/// Middleware that validates the auth session cookie and extracts the user_id.
///
/// If valid, inserts the user_id into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_session_id = session_id_from_headers(req.headers())
        .ok_or(ApiError::Port(PortError::Unauthorized))?
        .to_string();

    let user_id = state
        .users
        .validate_auth_session(&auth_session_id)
        .await
        .map_err(|e| {
            debug!("Rejected auth session: {:?}", e);
            ApiError::Port(PortError::Unauthorized)
        })?;

    req.extensions_mut().insert(user_id);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; lang=en"),
        );
        assert_eq!(session_id_from_headers(&headers), Some("abc-123"));
    }

    #[test]
    fn ignores_lookalike_and_empty_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sessionx=1; session="));
        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }
}
