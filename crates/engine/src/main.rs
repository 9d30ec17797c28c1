//! Mudhall Engine - Main entry point.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mudhall_engine::api;
use mudhall_engine::infrastructure::{
    behavior::NoopBehavior, clock::SystemClock, config::EngineConfig, storage::FileStorage,
};
use mudhall_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mudhall_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mudhall Engine");

    // Load configuration
    let config = EngineConfig::from_env()?;
    tracing::info!(
        data_path = %config.data_path.display(),
        public_path = %config.public_path.display(),
        "Configuration loaded"
    );

    // Create application
    let app = Arc::new(App::new(
        Arc::new(FileStorage::new(&config.data_path)),
        Arc::new(NoopBehavior),
        Arc::new(SystemClock::new()),
    ));

    // Load the world; the server does not start on bad data
    let summary = app.use_cases.persistence.load.execute().await?;
    tracing::info!(
        areas = summary.areas,
        rooms = summary.rooms,
        characters = summary.characters,
        items = summary.items,
        mobs = summary.mobs,
        instances = summary.instances,
        dropped_entries = summary.dropped_entries,
        "World loaded"
    );

    // Start maintenance tickers
    let cancel = CancellationToken::new();
    let tickers = app.scheduler.start(&cancel);

    // Build router
    let mut router = api::http::routes(&config.public_path)
        .route("/ws", get(api::websocket::ws_handler))
        .with_state(app.clone())
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Shut down
    cancel.cancel();
    for ticker in tickers {
        if let Err(e) = ticker.await {
            tracing::warn!(error = %e, "Ticker task ended abnormally");
        }
    }
    match app.use_cases.persistence.save.execute().await {
        Ok(bytes) => tracing::info!(bytes, "Final save complete"),
        Err(e) => tracing::error!(error = %e, "Final save failed"),
    }
    for session in app.sessions.all() {
        app.use_cases.session.teardown.execute(&session).await;
    }

    tracing::info!("Mudhall Engine stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
