//! Language assistant endpoints. All of them degrade to offline answers when
//! no remote model is configured or reachable.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::debug;

use super::jobs::parse_job_id;
use crate::app::dto::{AssistantSearchRequest, FeedQuery, LangQuery, TextRequest};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/search", post(search))
        .route("/translate", post(translate))
        .route("/speech", post(speech))
        .route("/readout/:id", get(readout))
}

/// Turn a spoken or typed query into feed filters and run the feed.
async fn search(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<AssistantSearchRequest>,
) -> axum::response::Response {
    let query = FeedQuery {
        lat: body.lat,
        lng: body.lng,
        max_distance_km: body.max_distance_km,
        ..FeedQuery::default()
    };
    let mut criteria = match query.to_criteria(services.max_distance_km) {
        Ok(c) => c,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_query", msg),
    };

    let intent = match services.assistant.parse_intent(&body.query, &body.lang).await {
        Ok(i) => i,
        Err(e) => return errors::assistant_error_to_response(e),
    };
    debug!(category = ?intent.category, keyword = ?intent.keyword, "parsed search intent");

    if let Some(category) = intent.category {
        criteria = criteria.in_category(category);
    }
    if let Some(keyword) = intent.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
        criteria = criteria.matching(keyword);
    }

    let snapshot = match services.blocking(|s| s.jobs.snapshot()).await {
        Ok(jobs) => jobs,
        Err(e) => return errors::service_error_to_response(e),
    };
    let jobs = services.feed.compute(&snapshot, &criteria);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "intent": intent,
            "count": jobs.len(),
            "jobs": jobs,
        })),
    )
        .into_response()
}

async fn translate(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<TextRequest>,
) -> axum::response::Response {
    match services.assistant.translate(&body.text, &body.lang).await {
        Ok(text) => (StatusCode::OK, Json(serde_json::json!({ "text": text }))).into_response(),
        Err(e) => errors::assistant_error_to_response(e),
    }
}

async fn speech(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<TextRequest>,
) -> axum::response::Response {
    match services.assistant.synthesize_speech(&body.text, &body.lang).await {
        Ok(speech) => (StatusCode::OK, Json(speech)).into_response(),
        Err(e) => errors::assistant_error_to_response(e),
    }
}

/// Spoken announcement text for a live posting.
async fn readout(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(lang): Query<LangQuery>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let job = match services.blocking(move |s| s.jobs.get(&job_id)).await {
        Ok(Some(job)) if job.is_displayable() => job,
        Ok(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "job not found"),
        Err(e) => return errors::service_error_to_response(e),
    };

    match services.assistant.job_readout(&job, &lang.lang).await {
        Ok(text) => (StatusCode::OK, Json(serde_json::json!({ "text": text }))).into_response(),
        Err(e) => errors::assistant_error_to_response(e),
    }
}
