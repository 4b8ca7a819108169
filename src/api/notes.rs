//! Contact Notes Routes
//!
//! Routes:
//! - GET /contacts/:contact_id/notes - List notes for a contact (newest first)
//! - POST /contacts/:contact_id/notes - Create a note for a contact

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db;
use crate::{AppState, Error, Result};

/// Longest note body accepted, in characters.
pub const MAX_NOTE_LENGTH: usize = 10_000;

/// Build note routes (mounted under `/contacts`).
pub fn routes() -> Router<AppState> {
    Router::new().route("/:contact_id/notes", get(list_notes).post(create_note))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a note.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    /// Note body
    pub content: String,
    /// Authoring user, if known
    pub author_id: Option<String>,
}

/// Note response.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: String,
    pub contact_id: String,
    pub content: String,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<db::Note> for NoteResponse {
    fn from(note: db::Note) -> Self {
        Self {
            created_at: parse_datetime(&note.created_at),
            updated_at: parse_datetime(&note.updated_at),
            id: note.id,
            contact_id: note.contact_id,
            content: note.content,
            author_id: note.author_id,
            author_name: note.author_name,
        }
    }
}

/// List notes response.
#[derive(Debug, Serialize)]
pub struct ListNotesResponse {
    pub notes: Vec<NoteResponse>,
    pub total: usize,
}

/// Parse a stored timestamp, accepting RFC 3339 and SQLite's datetime format.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .unwrap_or_else(|_| Utc::now())
}

impl CreateNoteRequest {
    /// Trim and check the body; blank author IDs are treated as absent.
    fn validate(self) -> Result<(String, Option<String>)> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(Error::Validation("content must not be empty".into()));
        }
        if content.chars().count() > MAX_NOTE_LENGTH {
            return Err(Error::Validation(format!(
                "content must be at most {} characters",
                MAX_NOTE_LENGTH
            )));
        }

        let author_id = self
            .author_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok((content.to_string(), author_id))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List all notes attached to a contact.
///
/// An unknown contact simply has no notes.
async fn list_notes(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> Result<Json<ListNotesResponse>> {
    let notes = db::list_notes_for_contact(&state.db, &contact_id).await?;
    debug!(contact_id = %contact_id, count = notes.len(), "Listed notes");

    let notes: Vec<NoteResponse> = notes.into_iter().map(NoteResponse::from).collect();

    Ok(Json(ListNotesResponse {
        total: notes.len(),
        notes,
    }))
}

/// Create a note for a contact.
async fn create_note(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    payload: std::result::Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    let Json(request) = payload?;
    let (content, author_id) = request.validate()?;

    if !db::contact_exists(&state.db, &contact_id).await? {
        return Err(Error::NotFound(format!("Contact {}", contact_id)));
    }
    if let Some(ref author) = author_id {
        if !db::user_exists(&state.db, author).await? {
            return Err(Error::NotFound(format!("User {}", author)));
        }
    }

    let note = db::create_note(
        &state.db,
        db::CreateNote {
            id: Uuid::new_v4().to_string(),
            contact_id,
            content,
            author_id,
        },
    )
    .await?;

    info!(note_id = %note.id, contact_id = %note.contact_id, "Created note");

    Ok((StatusCode::CREATED, Json(note.into())))
}
