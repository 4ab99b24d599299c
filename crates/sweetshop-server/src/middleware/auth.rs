use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use sweetshop_biscuit::SessionClaims;
use sweetshop_core::Role;
use uuid::Uuid;

/// Identity attached to a request by [`authenticate`].
#[derive(Clone, Debug)]
pub struct VerifiedSession {
    pub user_id: Uuid,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionClaims> for VerifiedSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
            expires_at: claims.expires_at,
        }
    }
}

/// Axum middleware verifying the bearer token:
/// - no token → 401
/// - expired token → 401
/// - malformed, forged or foreign-key token → 403
///
/// On success the decoded [`VerifiedSession`] is inserted into the request
/// extensions.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state.verifier.verify(&token).map_err(|e| {
        if e.is_expired() {
            tracing::warn!(error = %e, "rejected expired token");
            ApiError::Unauthorized("token expired".to_string())
        } else {
            tracing::warn!(error = %e, "rejected invalid token");
            ApiError::Forbidden("invalid token".to_string())
        }
    })?;

    tracing::debug!(user_id = %claims.user_id, role = %claims.role, "authenticated request");
    req.extensions_mut().insert(VerifiedSession::from(claims));

    Ok(next.run(req).await)
}

/// Admin gate. Must run after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let session = req
        .extensions()
        .get::<VerifiedSession>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    match session.role {
        Role::Admin => Ok(next.run(req).await),
        Role::User => {
            tracing::warn!(user_id = %session.user_id, path = %req.uri().path(), "admin role required");
            Err(ApiError::Forbidden("admin role required".to_string()))
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    let rest = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?;
    let token = rest.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
