//! Router for registration, login and logout

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};

use super::db::{self as accounts_db, RegisterError};
use super::public;
use crate::api::AuthUser;
use crate::api::public::{ApiError, required};
use crate::api::state::SharedState;
use crate::core::password::{hash_password, verify_against_dummy, verify_password};

fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn invalid_credentials() -> ApiError {
    ApiError::auth("Invalid credentials")
}

// Create an account
async fn register(
    State(state): State<SharedState>,
    payload: Result<Json<public::RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<public::RegisterResponse>), ApiError> {
    let Json(payload) = payload.map_err(ApiError::from_rejection)?;
    let (Some(email), Some(password)) = (required(payload.email), required(payload.password))
    else {
        return Err(ApiError::validation("Email and password are required"));
    };
    let display_name =
        required(payload.display_name).unwrap_or_else(|| default_display_name(&email));

    // Hashing blocks, run it off the async workers
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await?
        .map_err(|err| anyhow::anyhow!("Failed to hash password: {}", err))?;

    let user = match accounts_db::insert_user(&state.db, email, password_hash, display_name).await
    {
        Ok(user) => user,
        Err(RegisterError::EmailTaken) => {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
        Err(RegisterError::Db(err)) => return Err(err.into()),
    };
    tracing::info!(user_id = user.id, "Registered {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(public::RegisterResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

// Exchange credentials for a session token. Every kind of failure looks
// the same to the caller.
async fn login(
    State(state): State<SharedState>,
    payload: Result<Json<public::LoginRequest>, JsonRejection>,
) -> Result<Json<public::LoginResponse>, ApiError> {
    let Json(payload) = payload.map_err(ApiError::from_rejection)?;
    let (Some(email), Some(password)) = (required(payload.email), required(payload.password))
    else {
        return Err(invalid_credentials());
    };

    let found = accounts_db::find_credentials(&state.db, email).await?;
    let verified = tokio::task::spawn_blocking(move || match found {
        Some((user, hash)) => verify_password(&password, &hash).then_some(user),
        None => {
            verify_against_dummy(&password);
            None
        }
    })
    .await?;
    let Some(user) = verified else {
        return Err(invalid_credentials());
    };

    accounts_db::touch_last_login(&state.db, user.id).await?;
    let token = state.sessions.create(&user).await?;
    tracing::info!(user_id = user.id, "Login successful");

    Ok(Json(public::LoginResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

// Revoke the presented session
async fn logout(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<public::LogoutResponse>, ApiError> {
    state.sessions.revoke(&auth.token).await?;
    tracing::info!(user_id = auth.user.id, "Logged out");

    Ok(Json(public::LogoutResponse {
        message: "Logout successful".to_string(),
    }))
}

/// Create the accounts router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
