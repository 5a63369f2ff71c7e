//! services/api/src/web/chat.rs
//!
//! The health-assistant conversation.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use health_tracker_core::domain::{ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::required_text;
use crate::web::state::AppState;

/// Shown to the user when the assistant cannot answer.
pub const CHAT_APOLOGY: &str = "Sorry, I couldn't process your request. Please try again.";

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatExchange {
    pub message: ChatMessage,
    pub reply: ChatMessage,
}

/// GET /chat - The caller's conversation, oldest message first
#[utoipa::path(
    get,
    path = "/chat",
    responses(
        (status = 200, description = "The conversation", body = [ChatMessage]),
        (status = 401, description = "Not logged in")
    ),
    tag = "chat"
)]
pub async fn list_chat_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    Ok(Json(state.chat.list_messages(user_id).await?))
}

/// POST /chat - Send a message and get the assistant's reply
///
/// The user's message is stored before the assistant is asked, so it stays
/// in the conversation even when the reply fails.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 201, description = "Message and reply", body = ChatExchange),
        (status = 400, description = "Blank message"),
        (status = 502, description = "The assistant could not answer")
    ),
    tag = "chat"
)]
pub async fn post_chat_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let prompt = required_text(&req.message, "message")?;

    let history = state.chat.list_messages(user_id).await?;
    let message = state
        .chat
        .save_message(ChatMessage::new(user_id, ChatRole::User, prompt.as_str()))
        .await?;

    let reply_text = state
        .responder
        .respond(&history, &prompt)
        .await
        .map_err(|e| {
            error!(%user_id, "Chat responder failed: {:?}", e);
            ApiError::Upstream(CHAT_APOLOGY.to_string())
        })?;

    let reply = state
        .chat
        .save_message(ChatMessage::new(user_id, ChatRole::Assistant, reply_text))
        .await?;
    info!(%user_id, history = history.len(), "Chat reply stored");

    Ok((StatusCode::CREATED, Json(ChatExchange { message, reply })))
}
