//! API routes module

pub mod accounts;
pub mod emails;
pub mod health;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Liveness routes
        .merge(health::router())
        // Registration and login routes
        .merge(accounts::router())
        // Mailbox routes
        .merge(emails::router())
}
