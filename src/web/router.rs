//! Router configuration for the gallery API.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers::{
    create_photo, delete_photo, get_photo, list_photos, update_photo, AppState,
};
use super::middleware::create_cors_layer;

/// Prefix for all API routes.
pub const API_PREFIX: &str = "/api/v1.0";

/// Path under which uploaded files are served.
pub const UPLOADS_PATH: &str = "/static/uploads";

/// Room for multipart boundaries and text fields on top of the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = usize::try_from(app_state.max_upload_size.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);
    let upload_dir = ServeDir::new(app_state.storage.base_path());

    let photo_routes = Router::new()
        .route("/", get(list_photos).post(create_photo))
        .route(
            "/:id",
            get(get_photo).put(update_photo).delete(delete_photo),
        );

    let api_routes = Router::new().nest("/photos", photo_routes);

    Router::new()
        .nest(API_PREFIX, api_routes)
        .nest_service(UPLOADS_PATH, upload_dir)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
