use axum::{
    routing::{get, post, put},
    Router,
};

pub mod admin;
pub mod assistant;
pub mod feed;
pub mod jobs;
pub mod profiles;
pub mod system;

/// Router for endpoints open to anonymous workers.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/feed", get(feed::get_feed))
        .route("/jobs/:id", get(jobs::get_job))
        .route("/jobs/:id/contact", post(jobs::record_contact))
        .route("/jobs/:id/report", post(jobs::report_job))
        .nest("/assistant", assistant::router())
}

/// Router for all authenticated endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/jobs", post(jobs::post_job))
        .route("/me/jobs", get(jobs::my_jobs))
        .route("/me/preferences", get(profiles::get_preferences).put(profiles::put_preferences))
        .route("/profiles/me", get(profiles::get_me))
        .route("/profiles/worker", put(profiles::put_worker))
        .route("/profiles/employer", put(profiles::put_employer))
        .nest("/admin", admin::router())
}
