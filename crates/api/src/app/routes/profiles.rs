use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use nearbykaam_auth::Role;
use nearbykaam_infra::RepositoryResult;
use nearbykaam_profiles::{EmployerProfile, User, WorkerProfile};

use crate::app::dto::{PreferencesResponse, PreferencesUpdate};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

fn load_user(services: &AppServices, phone: &str, role: Role) -> RepositoryResult<User> {
    Ok(services
        .profiles
        .user(phone)?
        .unwrap_or_else(|| User::new(phone, role)))
}

/// The caller's account, created on first sight.
pub async fn get_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let (phone, role) = (principal.phone().to_string(), principal.role());
    match services.blocking(move |s| load_user(s, &phone, role)).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn put_worker(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(mut profile): Json<WorkerProfile>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Role::Worker) {
        return errors::authz_error_to_response(e);
    }

    let phone = principal.phone().to_string();
    let existing = {
        let phone = phone.clone();
        match services.blocking(move |s| s.profiles.worker(&phone)).await {
            Ok(p) => p,
            Err(e) => return errors::service_error_to_response(e),
        }
    };

    profile.phone = phone.clone();
    profile.created_at = existing.map_or_else(Utc::now, |p| p.created_at);
    if let Err(e) = profile.validate() {
        return errors::domain_error_to_response(e);
    }

    let saved = profile.clone();
    let stored = services
        .blocking(move |s| {
            let mut user = load_user(s, &phone, Role::Worker)?;
            user.attach_worker_profile(saved.clone());
            s.profiles.save_worker(&saved)?;
            s.profiles.save_user(&user)
        })
        .await;
    if let Err(e) = stored {
        return errors::service_error_to_response(e);
    }

    tracing::info!(phone = principal.phone(), "worker profile saved");
    (StatusCode::OK, Json(profile)).into_response()
}

/// Save the employer profile. Verification is admin-owned and kept as stored.
pub async fn put_employer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(mut profile): Json<EmployerProfile>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&principal, Role::Employer) {
        return errors::authz_error_to_response(e);
    }

    let phone = principal.phone().to_string();
    let existing = {
        let phone = phone.clone();
        match services.blocking(move |s| s.profiles.employer(&phone)).await {
            Ok(p) => p,
            Err(e) => return errors::service_error_to_response(e),
        }
    };

    profile.phone = phone.clone();
    match existing {
        Some(existing) => {
            profile.created_at = existing.created_at;
            profile.is_verified = existing.is_verified;
        }
        None => {
            profile.created_at = Utc::now();
            profile.is_verified = false;
        }
    }
    if let Err(e) = profile.validate() {
        return errors::domain_error_to_response(e);
    }

    let saved = profile.clone();
    let stored = services
        .blocking(move |s| {
            let mut user = load_user(s, &phone, Role::Employer)?;
            user.attach_employer_profile(saved.clone());
            s.profiles.save_employer(&saved)?;
            s.profiles.save_user(&user)
        })
        .await;
    if let Err(e) = stored {
        return errors::service_error_to_response(e);
    }

    tracing::info!(phone = principal.phone(), "employer profile saved");
    (StatusCode::OK, Json(profile)).into_response()
}

fn preferences_of(services: &AppServices, phone: &str) -> RepositoryResult<PreferencesResponse> {
    Ok(PreferencesResponse {
        language: services.preferences.language(phone)?,
        muted: services.preferences.is_muted(phone)?,
        last_location: services.preferences.last_location(phone)?,
    })
}

fn apply_preferences(
    services: &AppServices,
    phone: &str,
    update: &PreferencesUpdate,
) -> RepositoryResult<PreferencesResponse> {
    if let Some(lang) = update.language.as_deref() {
        services.preferences.set_language(phone, lang)?;
    }
    if let Some(muted) = update.muted {
        services.preferences.set_muted(phone, muted)?;
    }
    if let Some(location) = &update.last_location {
        services.preferences.set_last_location(phone, location)?;
    }
    preferences_of(services, phone)
}

pub async fn get_preferences(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let phone = principal.phone().to_string();
    match services.blocking(move |s| preferences_of(s, &phone)).await {
        Ok(prefs) => (StatusCode::OK, Json(prefs)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Partial update; absent fields are left as stored.
pub async fn put_preferences(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(update): Json<PreferencesUpdate>,
) -> axum::response::Response {
    if let Some(location) = &update.last_location {
        if let Err(e) = location.point().validate() {
            return errors::domain_error_to_response(e);
        }
    }

    let phone = principal.phone().to_string();
    match services.blocking(move |s| apply_preferences(s, &phone, &update)).await {
        Ok(prefs) => (StatusCode::OK, Json(prefs)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
