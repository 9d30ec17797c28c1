//! HTTP routes.

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::app::App;

/// API routes, with static client assets from `public_path` for every other path.
pub fn routes(public_path: &Path) -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .fallback_service(ServeDir::new(public_path))
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        assert_eq!(health().await, "OK");
    }
}
