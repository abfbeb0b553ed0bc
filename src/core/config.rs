use std::env;
use std::time::Duration;

/// Controls how strict the server is about its environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: String,
    pub database_url: String,
    pub session_cache_url: String,
    pub web_url: String,
    pub public_dir: String,
    pub mode: RuntimeMode,
    pub rate_limit_window: Duration,
    pub rate_limit_max: u32,
}

// Looks up the first variable in `keys` that is set and non-empty
fn env_var(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}

impl Default for AppConfig {
    fn default() -> Self {
        let host = env_var(&["WEBMAIL_HOST"]).unwrap_or("127.0.0.1".to_string());
        let port = env_var(&["WEBMAIL_PORT", "PORT"]).unwrap_or("3000".to_string());
        let database_url = env_var(&["WEBMAIL_DATABASE_URL", "DATABASE_URL"])
            .unwrap_or("./webmail.db".to_string());
        let session_cache_url =
            env_var(&["WEBMAIL_SESSION_CACHE_URL"]).unwrap_or("memory://".to_string());
        let web_url = env_var(&["WEBMAIL_WEB_URL", "WEB_URL"]).unwrap_or("*".to_string());
        let public_dir = env_var(&["WEBMAIL_PUBLIC_DIR"]).unwrap_or("./public".to_string());
        let mode = env_var(&["WEBMAIL_ENV", "NODE_ENV"])
            .map(|m| RuntimeMode::parse(&m))
            .unwrap_or_default();
        let rate_limit_window = env_var(&["WEBMAIL_RATE_LIMIT_WINDOW_SECS"])
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15 * 60));
        let rate_limit_max = env_var(&["WEBMAIL_RATE_LIMIT_MAX"])
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(100);

        Self {
            host,
            port,
            database_url,
            session_cache_url,
            web_url,
            public_dir,
            mode,
            rate_limit_window,
            rate_limit_max,
        }
    }
}

impl AppConfig {
    /// Default tracing filter when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> String {
        if self.mode.is_production() {
            format!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME"))
        } else {
            // axum logs rejections from built-in extractors with the `axum::rejection`
            // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
            format!(
                "{}=debug,tower_http=debug,axum::rejection=trace",
                env!("CARGO_CRATE_NAME")
            )
        }
    }
}
