//! Database queries for the accounts API
use rusqlite::OptionalExtension;
use thiserror::Error;
use tokio_rusqlite::{Connection, params};

use super::public::User;
use crate::core::db::NOW;

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Email already registered")]
    EmailTaken,
    #[error(transparent)]
    Db(#[from] tokio_rusqlite::Error),
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Insert a new user. The UNIQUE constraint on `email` is the only
/// duplicate check, so concurrent registrations can't both succeed.
pub async fn insert_user(
    db: &Connection,
    email: String,
    password_hash: String,
    display_name: String,
) -> Result<User, RegisterError> {
    let created = db
        .call(move |conn| {
            let result = conn.query_row(
                r"
                INSERT INTO users (email, password_hash, display_name)
                VALUES (?1, ?2, ?3)
                RETURNING id, email, display_name
                ",
                params![email, password_hash, display_name],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        display_name: row.get(2)?,
                    })
                },
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(err) if is_unique_violation(&err) => Ok(None),
                Err(err) => Err(err.into()),
            }
        })
        .await?;

    created.ok_or(RegisterError::EmailTaken)
}

/// Find an active user by email along with their stored password hash
pub async fn find_credentials(
    db: &Connection,
    email: String,
) -> Result<Option<(User, String)>, anyhow::Error> {
    let found = db
        .call(move |conn| {
            let result = conn
                .query_row(
                    r"
                    SELECT id, email, display_name, password_hash
                    FROM users
                    WHERE email = ?1 AND is_active = 1
                    ",
                    [&email],
                    |row| {
                        Ok((
                            User {
                                id: row.get(0)?,
                                email: row.get(1)?,
                                display_name: row.get(2)?,
                            },
                            row.get(3)?,
                        ))
                    },
                )
                .optional()?;
            Ok(result)
        })
        .await?;
    Ok(found)
}

pub async fn touch_last_login(db: &Connection, user_id: i64) -> Result<(), anyhow::Error> {
    db.call(move |conn| {
        conn.execute(
            &format!("UPDATE users SET last_login = {NOW} WHERE id = ?1"),
            [user_id],
        )?;
        Ok(())
    })
    .await?;
    Ok(())
}
