//! Router for the emails API

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};

use super::db::{self as emails_db, NewEmail};
use super::public;
use crate::api::AuthUser;
use crate::api::public::{ApiError, required};
use crate::api::state::SharedState;

// Inbox of the authenticated user
async fn list_emails(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<public::Email>>, ApiError> {
    let emails = emails_db::list_received(&state.db, auth.user.email).await?;
    Ok(Json(emails))
}

// Store a message from the authenticated user. There is no transport,
// the recipient only sees it by listing their own inbox.
async fn send_email(
    State(state): State<SharedState>,
    auth: AuthUser,
    payload: Result<Json<public::SendEmailRequest>, JsonRejection>,
) -> Result<Json<public::SendEmailResponse>, ApiError> {
    let Json(payload) = payload.map_err(ApiError::from_rejection)?;
    let (Some(to), Some(subject)) = (required(payload.to), required(payload.subject)) else {
        return Err(ApiError::validation("Missing required fields"));
    };

    let email_id = emails_db::insert_email(
        &state.db,
        NewEmail {
            user_id: auth.user.id,
            sender_email: auth.user.email.clone(),
            recipient_email: to.clone(),
            subject: subject.clone(),
            body: payload.body.unwrap_or_default(),
        },
    )
    .await?;
    tracing::info!(email_id, "Email sent from {} to {}: {}", auth.user.email, to, subject);

    Ok(Json(public::SendEmailResponse {
        message: "Email sent successfully".to_string(),
        email_id,
    }))
}

/// Create the emails router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/emails", get(list_emails))
        .route("/emails/send", post(send_email))
}
