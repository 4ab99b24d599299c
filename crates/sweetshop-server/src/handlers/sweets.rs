//! Sweet inventory handlers.
//!
//! Every route here runs behind `authenticate`; create, update, delete and
//! restock additionally sit behind `require_admin`.

use crate::{error::ApiError, middleware::auth::VerifiedSession, state::AppState};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;
use sweetshop_core::{
    Sweet, SweetId, SweetPatch,
    api_types::{CreateSweetRequest, SearchParams, StockRequest},
};

type SweetPath = Result<Path<SweetId>, PathRejection>;

pub async fn list_sweets(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Sweet>>, ApiError> {
    Ok(Json(state.sweets.list().await?))
}

pub async fn search_sweets(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Sweet>>, ApiError> {
    let Query(params) = params?;
    let params = params.normalized();
    Ok(Json(state.sweets.search(&params).await?))
}

pub async fn get_sweet(
    State(state): State<Arc<AppState>>,
    id: SweetPath,
) -> Result<Json<Sweet>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.sweets.get(id).await?))
}

pub async fn create_sweet(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<VerifiedSession>,
    payload: Result<Json<CreateSweetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Sweet>), ApiError> {
    let Json(request) = payload?;
    let new_sweet = request.validate()?;

    let sweet = state.sweets.create(&new_sweet).await?;
    tracing::info!(user_id = %session.user_id, sweet_id = sweet.id, "sweet created");
    Ok((StatusCode::CREATED, Json(sweet)))
}

pub async fn update_sweet(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<VerifiedSession>,
    id: SweetPath,
    payload: Result<Json<SweetPatch>, JsonRejection>,
) -> Result<Json<Sweet>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let patch = patch.validate()?;

    let sweet = state.sweets.update(id, &patch).await?;
    tracing::info!(user_id = %session.user_id, sweet_id = id, "sweet updated");
    Ok(Json(sweet))
}

pub async fn delete_sweet(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<VerifiedSession>,
    id: SweetPath,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.sweets.delete(id).await?;
    tracing::info!(user_id = %session.user_id, sweet_id = id, "sweet deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Open to every authenticated role.
pub async fn purchase_sweet(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<VerifiedSession>,
    id: SweetPath,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Result<Json<Sweet>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let quantity = request.positive_quantity()?;

    let sweet = state.sweets.purchase(id, quantity).await.inspect_err(|e| {
        tracing::info!(user_id = %session.user_id, sweet_id = id, quantity, error = %e, "purchase rejected");
    })?;
    tracing::info!(
        user_id = %session.user_id,
        sweet_id = id,
        quantity,
        remaining = sweet.quantity,
        "sweet purchased"
    );
    Ok(Json(sweet))
}

pub async fn restock_sweet(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<VerifiedSession>,
    id: SweetPath,
    payload: Result<Json<StockRequest>, JsonRejection>,
) -> Result<Json<Sweet>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let quantity = request.positive_quantity()?;

    let sweet = state.sweets.restock(id, quantity).await?;
    tracing::info!(
        user_id = %session.user_id,
        sweet_id = id,
        quantity,
        stock = sweet.quantity,
        "sweet restocked"
    );
    Ok(Json(sweet))
}
