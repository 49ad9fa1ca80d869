use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use nearbykaam_auth::{JwtValidator, Role};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        debug!(error = %e, "rejected bearer token");
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(PrincipalContext::from(claims));

    Ok(next.run(req).await)
}

/// Swap the token's admin principal for the one stored in the roster.
///
/// Runs after [`auth_middleware`]; missing or blocked admins are refused here.
pub async fn admin_roster_middleware(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Err(e) = authz::require(&principal, Role::Admin) {
        return errors::authz_error_to_response(e);
    }

    let phone = principal.phone().to_string();
    let entry = match services.blocking(move |s| s.profiles.managed_admin(&phone)).await {
        Ok(entry) => entry,
        Err(e) => return errors::service_error_to_response(e),
    };

    match authz::resolve_admin(&principal, entry) {
        Ok(resolved) => {
            req.extensions_mut().insert(resolved);
            next.run(req).await
        }
        Err(e) => {
            debug!(phone = principal.phone(), error = %e, "admin rejected by roster");
            errors::authz_error_to_response(e)
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
