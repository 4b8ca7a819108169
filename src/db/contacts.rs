//! Contact database queries.
//!
//! Contacts are owned by the wider CRM; this service only needs to look
//! them up as the parent of notes.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{now_timestamp, DbPool};

/// Contact record from the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a contact.
#[derive(Debug, Clone)]
pub struct CreateContact {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Create a new contact.
pub async fn create_contact(pool: &DbPool, input: CreateContact) -> Result<Contact> {
    let now = now_timestamp();

    let contact = sqlx::query_as::<_, Contact>(
        r#"
        INSERT INTO contacts (id, name, phone, email, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    Ok(contact)
}

/// Get a contact by ID.
pub async fn get_contact(pool: &DbPool, id: &str) -> Result<Contact> {
    sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Contact {}", id)))
}

/// Check whether a contact exists.
pub async fn contact_exists(pool: &DbPool, id: &str) -> Result<bool> {
    let (exists,): (i64,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM contacts WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists != 0)
}

/// Count all contacts.
pub async fn count_contacts(pool: &DbPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
