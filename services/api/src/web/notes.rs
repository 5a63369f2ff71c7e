//! services/api/src/web/notes.rs
//!
//! Note endpoints with search and tag filtering.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use health_tracker_core::{domain::Note, notes::filter_notes};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::{ensure_owner, required_text};

#[derive(Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Omitted fields keep their stored value.
#[derive(Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize, IntoParams)]
pub struct NoteQuery {
    /// Case-insensitive text searched in title and content.
    pub q: Option<String>,
    /// Comma-separated tags; a note must carry all of them.
    pub tag: Option<String>,
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

async fn load_note(state: &AppState, user_id: Uuid, note_id: Uuid) -> Result<Note, ApiError> {
    let note = state.notes.get_note(note_id).await?;
    ensure_owner(note.user_id, user_id, "Note", note_id)?;
    Ok(note)
}

/// GET /notes - The caller's notes, optionally filtered
#[utoipa::path(
    get,
    path = "/notes",
    params(NoteQuery),
    responses(
        (status = 200, description = "Matching notes", body = [Note]),
        (status = 401, description = "Not logged in")
    ),
    tag = "notes"
)]
pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<NoteQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.notes.list_notes(user_id).await?;
    let tags: Vec<String> = query
        .tag
        .as_deref()
        .map(|t| clean_tags(t.split(',').map(str::to_string).collect()))
        .unwrap_or_default();
    let query_text = query.q.as_deref().map(str::trim).unwrap_or_default();

    let matching = filter_notes(&notes, query_text, &tags)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(matching))
}

/// POST /notes - Create a note
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 400, description = "Blank title")
    ),
    tag = "notes"
)]
pub async fn create_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();
    let note = Note {
        id: Uuid::new_v4(),
        user_id,
        title: required_text(&req.title, "title")?,
        content: req.content,
        tags: clean_tags(req.tags),
        created_at: now,
        updated_at: now,
    };
    let note = state.notes.create_note(note).await?;
    info!(note_id = %note.id, %user_id, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /notes/{id} - Update a note
#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 400, description = "Blank title"),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
pub async fn update_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(note_id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    let mut note = load_note(&state, user_id, note_id).await?;
    if let Some(title) = req.title {
        note.title = required_text(&title, "title")?;
    }
    if let Some(content) = req.content {
        note.content = content;
    }
    if let Some(tags) = req.tags {
        note.tags = clean_tags(tags);
    }
    note.updated_at = Utc::now();
    Ok(Json(state.notes.update_note(note).await?))
}

/// DELETE /notes/{id} - Delete a note
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(note_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_note(&state, user_id, note_id).await?;
    state.notes.delete_note(note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::clean_tags;

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = vec![" sleep".to_string(), "".to_string(), "sleep ".to_string(), "diet".to_string()];
        assert_eq!(clean_tags(tags), vec!["sleep".to_string(), "diet".to_string()]);
    }
}
