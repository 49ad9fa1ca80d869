use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::dto::{FeedQuery, FeedResponse};
use crate::app::errors;
use crate::app::services::AppServices;

/// The worker job feed. Evaluates one snapshot of the job list.
pub async fn get_feed(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<FeedQuery>,
) -> axum::response::Response {
    let criteria = match query.to_criteria(services.max_distance_km) {
        Ok(c) => c,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_query", msg),
    };

    let snapshot = match services.blocking(|s| s.jobs.snapshot()).await {
        Ok(jobs) => jobs,
        Err(e) => return errors::service_error_to_response(e),
    };

    let jobs = services.feed.compute(&snapshot, &criteria);
    (StatusCode::OK, Json(FeedResponse::from(jobs))).into_response()
}
