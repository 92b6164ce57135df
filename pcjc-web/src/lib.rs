//! pcjc-web library interface
//!
//! Read-side HTTP service over the award store: filtered listings, award
//! detail with its audit trail, per-year counts and the image library.

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::services::ServeDir;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Image library served under /images
    pub images_dir: PathBuf,
}

impl AppState {
    pub fn new(db: SqlitePool, images_dir: PathBuf) -> Self {
        Self { db, images_dir }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(&state.images_dir);

    Router::new()
        .merge(api::award_routes())
        .merge(api::health_routes())
        .nest_service("/images", images)
        .with_state(state)
}
