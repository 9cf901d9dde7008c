//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (request IDs, logging, timeouts, CORS)
//! - Graceful shutdown handling and store release

use crate::config::AppConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, health, not_found, users};
use crate::state::{AppState, connect_store};
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use docrest::store::DocumentStore;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack, outermost first:
/// 1. HTTP tracing spans
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS
/// 5. Timeout handling (408)
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let user_routes = Router::new()
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/users/",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .merge(user_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the global tracing subscriber.
///
/// Debug mode logs human-readable lines; otherwise every event is a JSON object.
pub fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if config.debug {
        subscriber.init();
    } else {
        subscriber
            .with_thread_ids(true)
            .with_thread_names(true)
            .json()
            .init();
    }
}

/// Start the HTTP server
///
/// Connects the configured document store, serves requests until SIGTERM or
/// Ctrl+C, then shuts the store down. Returns an error if the store cannot be
/// built or the listener cannot bind.
///
/// ```rust,no_run
/// use docrest_server::AppConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load()?;
///     docrest_server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    init_tracing(&config);

    let store = connect_store(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), store.clone()));
    let app = build_router(state);

    let addr = config.bind_addr();

    tracing::info!("Starting {} v{} on {}", config.app_name, config.app_version, addr);
    tracing::info!(
        "Store: {:?}, database: {}",
        config.store_backend,
        config.database_name
    );
    tracing::info!("Timeout: {}s, CORS: {}", config.timeout_secs, config.enable_cors);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    release_store(&store, served).await
}

/// Shuts the store down once serving has stopped and reports how serving ended.
///
/// A failed store shutdown is logged rather than returned so it never masks a serve error.
async fn release_store(store: &DocumentStore, served: std::io::Result<()>) -> anyhow::Result<()> {
    if let Err(err) = store.shutdown().await {
        tracing::warn!(error = %err, "Store shutdown failed");
    }
    tracing::info!("Server shutdown complete");

    Ok(served?)
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
