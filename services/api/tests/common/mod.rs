//! Helpers to drive the router in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use api_lib::web::{build_router, state::AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory())
    }

    pub fn with_state(state: AppState) -> Self {
        let router = build_router(Arc::new(state)).expect("router builds with default config");
        Self { router }
    }

    /// Sends one request and returns the status, the `Set-Cookie` header and the JSON body.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, set_cookie, json)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _, json) = self.send_raw(method, uri, Some(cookie), body).await;
        (status, json)
    }

    /// Registers a user and returns the `session=...` cookie pair.
    pub async fn register(&self, email: &str) -> String {
        let (status, set_cookie, _) = self
            .send_raw(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "name": "Ana",
                    "email": email,
                    "password": "correct horse",
                    "age": 30,
                    "gender": "female"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        session_pair(&set_cookie.expect("register sets a cookie"))
    }
}

/// `session=abc; HttpOnly; ...` -> `session=abc`
pub fn session_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
