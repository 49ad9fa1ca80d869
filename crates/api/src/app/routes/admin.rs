//! Moderation console: job queue, decisions, audit trail and admin roster.
//!
//! Every route runs behind [`admin_roster_middleware`], so handlers see the
//! caller with the permissions stored in the roster, not the token's.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;

use nearbykaam_auth::{AuthzError, Permission, Role};
use nearbykaam_jobs::{
    AdminJobFilter, ApproveJob, JobAction, JobCommand, ModerationStats, RejectJob,
};
use nearbykaam_profiles::{EntityType, User};

use super::jobs::parse_job_id;
use crate::app::dto::ModerationNoteRequest;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;
use crate::middleware::admin_roster_middleware;

pub fn router() -> Router {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", delete(delete_job))
        .route("/jobs/:id/approve", post(approve_job))
        .route("/jobs/:id/reject", post(reject_job))
        .route("/jobs/:id/pause", post(pause_job))
        .route("/jobs/:id/resume", post(resume_job))
        .route("/jobs/:id/expire", post(expire_job))
        .route("/jobs/:id/verify", post(verify_employer))
        .route("/jobs/:id/clear-report", post(clear_report))
        .route("/stats", get(stats))
        .route("/logs", get(logs))
        .route("/workers", get(workers))
        .route("/admins", get(list_admins).post(upsert_admin))
        .route_layer(axum::middleware::from_fn(admin_roster_middleware))
}

fn require_permission(
    principal: &PrincipalContext,
    required: Permission,
) -> Result<(), axum::response::Response> {
    crate::authz::authorize_admin(principal, required).map_err(errors::authz_error_to_response)
}

/// Authorize, execute a lifecycle command, audit, and render the updated job.
async fn moderate(
    services: Arc<AppServices>,
    principal: PrincipalContext,
    required: Permission,
    action: &'static str,
    cmd: JobCommand,
    details: String,
) -> axum::response::Response {
    if let Err(resp) = require_permission(&principal, required) {
        return resp;
    }

    let job_id = cmd.job_id().to_string();
    let admin = principal.clone();
    let applied = services
        .blocking(move |s| {
            let outcome = s.jobs.execute(cmd)?;
            s.audit(&admin, action, EntityType::Job, &job_id, details);
            Ok(outcome)
        })
        .await;

    match applied {
        Ok((job, events)) => {
            tracing::info!(job_id = %job.id, admin = principal.phone(), action, "moderation action applied");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "job": job,
                    "events_committed": events.len(),
                })),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

fn note_of(body: Option<Json<ModerationNoteRequest>>) -> Option<String> {
    body.and_then(|Json(b)| b.note)
}

async fn list_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Query(filter): Query<AdminJobFilter>,
) -> axum::response::Response {
    match services.blocking(|s| s.jobs.snapshot()).await {
        Ok(jobs) => {
            let matching = filter.apply(&jobs, Utc::now());
            (
                StatusCode::OK,
                Json(serde_json::json!({ "count": matching.len(), "jobs": matching })),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn stats(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.blocking(|s| s.jobs.snapshot()).await {
        Ok(jobs) => (StatusCode::OK, Json(ModerationStats::from_jobs(&jobs))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn approve_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Option<Json<ModerationNoteRequest>>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let note = note_of(body);

    let cmd = JobCommand::ApproveJob(ApproveJob {
        job_id,
        admin_id: principal.phone().to_string(),
        note: note.clone(),
        occurred_at: Utc::now(),
    });
    moderate(
        services,
        principal,
        Permission::JobModeration,
        "APPROVE_JOB",
        cmd,
        note.unwrap_or_default(),
    )
    .await
}

async fn reject_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Option<Json<ModerationNoteRequest>>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let note = note_of(body);

    let cmd = JobCommand::RejectJob(RejectJob {
        job_id,
        admin_id: principal.phone().to_string(),
        note: note.clone(),
        occurred_at: Utc::now(),
    });
    moderate(
        services,
        principal,
        Permission::JobModeration,
        "REJECT_JOB",
        cmd,
        note.unwrap_or_default(),
    )
    .await
}

/// Commands that carry nothing but the target job.
async fn simple_action(
    services: Arc<AppServices>,
    principal: PrincipalContext,
    id: &str,
    required: Permission,
    action: &'static str,
    command: fn(JobAction) -> JobCommand,
) -> axum::response::Response {
    match parse_job_id(id) {
        Ok(job_id) => {
            let cmd = command(JobAction::now(job_id));
            moderate(services, principal, required, action, cmd, String::new()).await
        }
        Err(resp) => resp,
    }
}

async fn pause_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    simple_action(services, principal, &id, Permission::JobModeration, "PAUSE_JOB", JobCommand::PauseJob).await
}

async fn resume_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    simple_action(services, principal, &id, Permission::JobModeration, "RESUME_JOB", JobCommand::ResumeJob).await
}

async fn expire_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    simple_action(services, principal, &id, Permission::JobModeration, "EXPIRE_JOB", JobCommand::ExpireJob).await
}

async fn clear_report(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    simple_action(services, principal, &id, Permission::SafetyReports, "CLEAR_REPORT", JobCommand::ClearReport).await
}

/// Verify the employer behind a posting; the employer's profile is flagged too.
async fn verify_employer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let response = moderate(
        Arc::clone(&services),
        principal.clone(),
        Permission::EmployerVerification,
        "VERIFY_EMPLOYER",
        JobCommand::VerifyEmployer(JobAction::now(job_id.clone())),
        String::new(),
    )
    .await;
    if !response.status().is_success() {
        return response;
    }

    let flagged = services
        .blocking(move |s| {
            let Some(job) = s.jobs.get(&job_id)? else {
                return Ok(());
            };
            match s.profiles.employer(&job.employer_id)? {
                Some(mut profile) if !profile.is_verified => {
                    profile.is_verified = true;
                    s.profiles.save_employer(&profile)?;
                    s.audit(&principal, "VERIFY_EMPLOYER", EntityType::Employer, &job.employer_id, "");
                }
                _ => {}
            }
            Ok(())
        })
        .await;

    match flagged {
        Ok(()) => response,
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn delete_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_permission(&principal, Permission::JobModeration) {
        return resp;
    }
    let job_id = match parse_job_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let removed = services
        .blocking(move |s| {
            let removed = s.jobs.remove(&job_id)?;
            if removed {
                s.audit(&principal, "DELETE_JOB", EntityType::Job, job_id.as_str(), "");
            }
            Ok(removed)
        })
        .await;

    match removed {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "job not found"),
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn logs(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.blocking(|s| s.admin_log.list()).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn workers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = require_permission(&principal, Permission::UserManagement) {
        return resp;
    }

    match services.blocking(|s| s.profiles.workers()).await {
        Ok(workers) => (StatusCode::OK, Json(workers)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

async fn list_admins(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = require_permission(&principal, Permission::UserManagement) {
        return resp;
    }

    match services.blocking(|s| s.profiles.managed_admins()).await {
        Ok(admins) => (StatusCode::OK, Json(admins)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Add or update an admin in the roster. Takes effect on the admin's next request.
async fn upsert_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(mut admin): Json<User>,
) -> axum::response::Response {
    if let Err(resp) = require_permission(&principal, Permission::UserManagement) {
        return resp;
    }

    admin.phone = match nearbykaam_core::normalize_mobile(&admin.phone) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if admin.role != Role::Admin {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "role must be ADMIN");
    }
    // Only full-access admins may hand out full access.
    if admin.permissions.contains(&Permission::FullAccess)
        && !principal.permissions().contains(&Permission::FullAccess)
    {
        return errors::authz_error_to_response(AuthzError::Forbidden(Permission::FullAccess));
    }

    let details = admin
        .permissions
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let stored = services
        .blocking(move |s| {
            let phone = admin.phone.clone();
            s.profiles.upsert_managed_admin(admin)?;
            s.audit(&principal, "UPSERT_ADMIN", EntityType::Admin, &phone, details);
            Ok(())
        })
        .await;

    match stored {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
