//! Award listing and detail endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use pcjc_common::db::{self, models::AwardRecord, models::Correction, models::YearCount, AwardFilter};

use crate::{ApiError, ApiResult, AppState};

/// Listings are capped so a filterless request cannot dump the whole table
const DEFAULT_LIMIT: i64 = 200;
const MAX_LIMIT: i64 = 1000;

pub fn award_routes() -> Router<AppState> {
    Router::new()
        .route("/api/awards", get(list_awards))
        .route("/api/awards/:award_num", get(get_award))
        .route("/api/years", get(years))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    year: Option<i64>,
    exhibitor: Option<String>,
    location: Option<String>,
    limit: Option<i64>,
}

/// One award plus its audit trail
#[derive(Debug, Serialize)]
struct AwardDetail {
    #[serde(flatten)]
    record: AwardRecord,
    corrections: Vec<Correction>,
}

/// GET /api/awards?year=&exhibitor=&location=&limit=
async fn list_awards(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<AwardRecord>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit <= 0 {
        return Err(ApiError::BadRequest("limit must be positive".to_string()));
    }

    let filter = AwardFilter {
        year: params.year,
        exhibitor: params.exhibitor,
        location: params.location,
        limit: Some(limit.min(MAX_LIMIT)),
    };

    let records = db::list_awards(&state.db, &filter).await?;
    Ok(Json(records))
}

/// GET /api/awards/:award_num
async fn get_award(
    State(state): State<AppState>,
    Path(award_num): Path<String>,
) -> ApiResult<Json<AwardDetail>> {
    let record = db::get_award(&state.db, &award_num)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("award {}", award_num)))?;
    let corrections = db::corrections_for(&state.db, &award_num).await?;

    Ok(Json(AwardDetail {
        record,
        corrections,
    }))
}

/// GET /api/years
async fn years(State(state): State<AppState>) -> ApiResult<Json<Vec<YearCount>>> {
    Ok(Json(db::year_counts(&state.db).await?))
}
