//! `POST /auth/register` and `POST /auth/login`.

use crate::{
    auth::password::{hash_password, verify_password},
    error::ApiError,
    state::AppState,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;
use sweetshop_core::{
    Role, User,
    api_types::{CredentialsRequest, LoginResponse},
};

/// Create a `user`-role account. The response never echoes the password.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(request) = payload?;
    let (username, password) = request.validate()?;

    let hash = hash_password(password).await?;
    let user = state.users.create(&username, &hash, Role::User).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a session token.
///
/// Unknown user and wrong password produce the same 401.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let (username, password) = request.validate()?;

    let Some(record) = state.users.find_by_username(&username).await? else {
        tracing::warn!(%username, "login failed");
        return Err(invalid_credentials());
    };
    if !verify_password(password, record.password_hash).await? {
        tracing::warn!(%username, "login failed");
        return Err(invalid_credentials());
    }

    let user = record.user;
    let (token, claims) = state
        .tokens
        .mint_session_token(user.id, user.role, state.token_ttl)
        .map_err(|e| ApiError::Internal(e.into()))?;

    tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
    Ok(Json(LoginResponse {
        token,
        role: user.role,
        expires_at: claims.expires_at,
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("invalid username or password".to_string())
}
