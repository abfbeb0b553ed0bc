mod auth;
pub mod rate_limit;
pub mod routes;
mod server;
pub use auth::AuthUser;
pub use server::{app, serve};
pub mod public;
mod state;
pub use state::{AppState, SharedState};
