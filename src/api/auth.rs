//! Bearer token authentication for protected routes

use axum::extract::FromRequestParts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use http::request::Parts;

use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::session::SessionUser;

/// The session behind the request's bearer token. Resolved against the
/// session cache on every request.
pub struct AuthUser {
    pub token: String,
    pub user: SessionUser,
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::auth("Authentication required"))?;

        let token = bearer.token().trim().to_string();
        if token.is_empty() {
            return Err(ApiError::auth("Authentication required"));
        }

        match state.sessions.lookup(&token).await? {
            Some(user) => Ok(Self { token, user }),
            None => Err(ApiError::auth("Invalid or expired token")),
        }
    }
}
