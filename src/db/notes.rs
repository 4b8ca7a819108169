//! Contact note database queries.
//!
//! Notes are free-form text attached to a contact, optionally authored by a
//! user. Reads join the author's display name.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{now_timestamp, DbPool};

/// Note record joined with its author's name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub contact_id: String,
    pub content: String,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a note.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub id: String,
    pub contact_id: String,
    pub content: String,
    pub author_id: Option<String>,
}

const NOTE_COLUMNS: &str = r#"
    n.id, n.contact_id, n.content, n.author_id, u.name AS author_name,
    n.created_at, n.updated_at
"#;

/// List the notes of a contact, newest first.
///
/// Notes created within the same timestamp keep insertion order (newest first).
pub async fn list_notes_for_contact(pool: &DbPool, contact_id: &str) -> Result<Vec<Note>> {
    let sql = format!(
        r#"
        SELECT {NOTE_COLUMNS}
        FROM contact_notes n
        LEFT JOIN users u ON u.id = n.author_id
        WHERE n.contact_id = ?
        ORDER BY n.created_at DESC, n.rowid DESC
        "#
    );

    let notes = sqlx::query_as::<_, Note>(&sql)
        .bind(contact_id)
        .fetch_all(pool)
        .await?;

    Ok(notes)
}

/// Get a note by ID.
pub async fn get_note(pool: &DbPool, id: &str) -> Result<Note> {
    let sql = format!(
        r#"
        SELECT {NOTE_COLUMNS}
        FROM contact_notes n
        LEFT JOIN users u ON u.id = n.author_id
        WHERE n.id = ?
        "#
    );

    sqlx::query_as::<_, Note>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Note {}", id)))
}

/// Create a note and return it with the author joined.
pub async fn create_note(pool: &DbPool, input: CreateNote) -> Result<Note> {
    let now = now_timestamp();

    sqlx::query(
        r#"
        INSERT INTO contact_notes (id, contact_id, content, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.id)
    .bind(&input.contact_id)
    .bind(&input.content)
    .bind(&input.author_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            Error::NotFound(format!(
                "Contact {} or author {}",
                input.contact_id,
                input.author_id.as_deref().unwrap_or("(none)")
            ))
        }
        _ => Error::Database(e),
    })?;

    get_note(pool, &input.id).await
}

/// Count all notes.
pub async fn count_notes(pool: &DbPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contact_notes")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
