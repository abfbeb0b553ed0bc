use anyhow::Result;

use crate::api;
use crate::core::AppConfig;

pub async fn run(host: Option<String>, port: Option<String>, mut config: AppConfig) -> Result<()> {
    // Flags take precedence over the environment
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    api::serve(config).await
}
