use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use nearbykaam_auth::Role;
use nearbykaam_core::JobId;
use nearbykaam_jobs::{JobAction, JobCommand, PostJob, RecordContact};

use crate::app::dto::{ContactRequest, PostJobRequest};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub(crate) fn parse_job_id(id: &str) -> Result<JobId, axum::response::Response> {
    id.parse::<JobId>()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid job id"))
}

/// A single live posting.
pub async fn get_job(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.blocking(move |s| s.jobs.get(&job_id)).await {
        Ok(Some(job)) if job.is_displayable() => (StatusCode::OK, Json(job)).into_response(),
        Ok(_) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "job not found"),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Count a press of the call or WhatsApp button.
pub async fn record_contact(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ContactRequest>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = JobCommand::RecordContact(RecordContact {
        job_id,
        channel: body.channel,
        occurred_at: Utc::now(),
    });

    match services.blocking(move |s| s.jobs.execute(cmd)).await {
        Ok((job, _)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": job.id,
                "callCount": job.call_count,
                "whatsappCount": job.whatsapp_count,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Flag a posting for the safety queue.
pub async fn report_job(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = JobCommand::ReportJob(JobAction::now(job_id));
    match services.blocking(move |s| s.jobs.execute(cmd)).await {
        Ok((job, _)) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "id": job.id, "isReported": job.is_reported })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Employer submits a posting; it waits for moderation before going live.
pub async fn post_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<PostJobRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Role::Employer) {
        return errors::authz_error_to_response(e);
    }

    let phone = principal.phone().to_string();
    let profile = match services.blocking(move |s| s.profiles.employer(&phone)).await {
        Ok(p) => p,
        Err(e) => return errors::service_error_to_response(e),
    };

    let employer_name = body
        .employer_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| profile.as_ref().map(|p| p.display_name().to_string()))
        .unwrap_or_default();

    let whatsapp_number = if body.same_as_call {
        None
    } else {
        body.whatsapp_number
    };

    let cmd = JobCommand::PostJob(PostJob {
        job_id: JobId::new(),
        employer_id: principal.phone().to_string(),
        employer_name,
        employer_first_name: profile.as_ref().map(|p| p.first_name.clone()),
        shop_name: profile.as_ref().map(|p| p.shop_name.clone()),
        title: body.title,
        job_role: body.job_role,
        category: body.category,
        industry: body
            .industry
            .or_else(|| profile.as_ref().and_then(|p| p.industry.clone())),
        description: body.description,
        call_number: body
            .call_number
            .unwrap_or_else(|| principal.phone().to_string()),
        whatsapp_number,
        shop_photo: body
            .shop_photo
            .or_else(|| profile.as_ref().and_then(|p| p.shop_photo.clone())),
        location: body.location,
        salary_amount: body.salary_amount,
        salary_type: body.salary_type,
        expiry_days: body.expiry_days,
        experience_level: body.experience_level,
        employment_type: body.employment_type,
        work_mode: body.work_mode,
        occurred_at: Utc::now(),
    });

    match services.blocking(move |s| s.jobs.execute(cmd)).await {
        Ok((job, events)) => {
            tracing::info!(job_id = %job.id, employer = principal.phone(), "job posted for review");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "id": job.id,
                    "status": job.status,
                    "events_committed": events.len(),
                })),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

/// The caller's own postings in every status.
pub async fn my_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Role::Employer) {
        return errors::authz_error_to_response(e);
    }

    let phone = principal.phone().to_string();
    match services.blocking(move |s| s.jobs.by_employer(&phone)).await {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
