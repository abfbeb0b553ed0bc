use std::sync::Arc;

use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::session::Sessions;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub db: Connection,
    pub sessions: Sessions,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Connection, sessions: Sessions, config: AppConfig) -> Self {
        Self {
            db,
            sessions,
            config,
        }
    }
}
