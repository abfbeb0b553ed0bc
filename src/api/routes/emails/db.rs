//! Database queries for the emails API
use anyhow::{Error, Result};
use rusqlite::types::Type;
use tokio_rusqlite::{Connection, params};

use super::public::Email;

/// Most messages returned by a single listing
pub const MAX_LISTED_EMAILS: i64 = 50;

pub struct NewEmail {
    pub user_id: i64,
    pub sender_email: String,
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
}

/// Messages addressed to `recipient`, newest first
pub async fn list_received(db: &Connection, recipient: String) -> Result<Vec<Email>, Error> {
    let emails = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT
                  e.id,
                  e.user_id,
                  e.sender_email,
                  e.recipient_email,
                  e.subject,
                  e.body,
                  e.is_read,
                  e.is_starred,
                  e.labels,
                  e.created_at,
                  u.display_name AS sender_display
                FROM emails e
                LEFT JOIN users u ON e.sender_email = u.email
                WHERE e.recipient_email = ?1
                ORDER BY e.created_at DESC, e.id DESC
                LIMIT ?2
                ",
            )?;
            let rows = stmt
                .query_map(params![recipient, MAX_LISTED_EMAILS], |row| {
                    let labels: String = row.get(8)?;
                    let labels: Vec<String> = serde_json::from_str(&labels).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
                    })?;
                    Ok(Email {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        sender_email: row.get(2)?,
                        recipient_email: row.get(3)?,
                        subject: row.get(4)?,
                        body: row.get(5)?,
                        is_read: row.get(6)?,
                        is_starred: row.get(7)?,
                        labels,
                        created_at: row.get(9)?,
                        sender_display: row.get(10)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;
    Ok(emails)
}

/// Store a sent message and return its id
pub async fn insert_email(db: &Connection, email: NewEmail) -> Result<i64, Error> {
    let id = db
        .call(move |conn| {
            let id = conn.query_row(
                r"
                INSERT INTO emails (user_id, sender_email, recipient_email, subject, body)
                VALUES (?1, ?2, ?3, ?4, ?5)
                RETURNING id
                ",
                params![
                    email.user_id,
                    email.sender_email,
                    email.recipient_email,
                    email.subject,
                    email.body,
                ],
                |row| row.get(0),
            )?;
            Ok(id)
        })
        .await?;
    Ok(id)
}
