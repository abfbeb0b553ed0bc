//! Public API types

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

// Errors

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input
    Validation(String),
    /// Duplicate unique key
    Conflict(String),
    /// Missing, invalid or expired token, or failed credential match
    Auth(String),
    /// Anything unexpected. Details are logged, never returned.
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Malformed JSON bodies are validation errors
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::Conflict(message) => (StatusCode::CONFLICT, message),
            Self::Auth(message) => (StatusCode::UNAUTHORIZED, message),
            Self::Internal(err) => {
                // Always log the error
                tracing::error!("{:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

/// Treats absent and empty fields alike
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// Re-export public types from each route

pub mod accounts {
    pub use crate::api::routes::accounts::public::*;
}

pub mod emails {
    pub use crate::api::routes::emails::public::*;
}

pub mod health {
    pub use crate::api::routes::health::public::*;
}
