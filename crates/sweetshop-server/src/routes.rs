use crate::{
    handlers::{auth, healthz, sweets},
    middleware::auth::{authenticate, require_admin},
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Full application router.
///
/// ```text
/// GET    /healthz
/// POST   /api/auth/register
/// POST   /api/auth/login
/// GET    /api/sweets                  authenticated
/// GET    /api/sweets/search           authenticated
/// GET    /api/sweets/{id}             authenticated
/// POST   /api/sweets/{id}/purchase    authenticated
/// POST   /api/sweets                  admin
/// PUT    /api/sweets/{id}             admin
/// DELETE /api/sweets/{id}             admin
/// POST   /api/sweets/{id}/restock     admin
/// ```
pub fn build_router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/sweets", post(sweets::create_sweet))
        .route(
            "/sweets/{id}",
            put(sweets::update_sweet).delete(sweets::delete_sweet),
        )
        .route("/sweets/{id}/restock", post(sweets::restock_sweet))
        .route_layer(middleware::from_fn(require_admin));

    // `search` is declared ahead of `{id}` so the literal segment is never
    // read as an id.
    let authenticated = Router::new()
        .route("/sweets", get(sweets::list_sweets))
        .route("/sweets/search", get(sweets::search_sweets))
        .route("/sweets/{id}", get(sweets::get_sweet))
        .route("/sweets/{id}/purchase", post(sweets::purchase_sweet))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(authenticated);

    let cors = if state.cfg.server.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
