//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{ApiResult, AppState};

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health - liveness plus a cheap store probe
async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let awards: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM awards")
        .fetch_one(&state.db)
        .await
        .map_err(pcjc_common::Error::from)?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "awards": awards,
    })))
}
