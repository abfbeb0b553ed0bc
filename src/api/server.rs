use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::middleware;
use axum::{Router, extract::Request, response::Response};
use http::{HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::rate_limit::{RateLimiter, rate_limit};
use super::routes;
use crate::api::state::{AppState, SharedState};
use crate::core::{
    AppConfig,
    db::{async_db, database_path, initialize_db},
};
use crate::session::Sessions;

async fn set_static_cache_control(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

async fn set_security_headers(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::X_DNS_PREFETCH_CONTROL,
        HeaderValue::from_static("off"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=15552000; includeSubDomains"),
    );
    headers.insert(
        "cross-origin-opener-policy",
        HeaderValue::from_static("same-origin"),
    );
    response
}

/// Any origin when `web_url` is `*`, otherwise only `web_url` with
/// credentials allowed.
fn cors_layer(web_url: &str) -> CorsLayer {
    if web_url == "*" {
        return CorsLayer::permissive();
    }

    match HeaderValue::from_str(web_url.trim_end_matches('/')) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(err) => {
            tracing::warn!("Ignoring invalid web url {}: {}", web_url, err);
            CorsLayer::new()
        }
    }
}

pub fn app(shared_state: SharedState) -> Router {
    let config = &shared_state.config;
    let cors = cors_layer(&config.web_url);
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_window,
        config.rate_limit_max,
    ));
    let public_dir = Path::new(&config.public_dir);

    Router::new()
        // Liveness probe outside of the rate limited API
        .merge(routes::health::router())
        // API routes
        .nest(
            "/api",
            routes::router().layer(middleware::from_fn_with_state(limiter, rate_limit)),
        )
        // Static server of the browser client, unknown paths get the index
        .fallback_service(
            ServiceBuilder::new()
                .layer(middleware::from_fn(set_static_cache_control))
                .service(
                    ServeDir::new(public_dir)
                        .precompressed_gzip()
                        .not_found_service(ServeFile::new(public_dir.join("index.html"))),
                ),
        )
        .layer(middleware::from_fn(set_security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

// Run the server
pub async fn serve(config: AppConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.mode.is_production() && database_path(&config.database_url).is_none() {
        return Err(anyhow!(
            "Refusing to run with an in-memory database in production"
        ));
    }

    let db = async_db(&config.database_url).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    tracing::info!("Database initialized");

    let sessions = Sessions::from_url(&config.session_cache_url);
    tracing::info!("Session cache: {}", sessions.backend_name());

    let addr = format!("{}:{}", config.host, config.port);
    let app_state = AppState::new(db, sessions, config);
    let app = app(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
