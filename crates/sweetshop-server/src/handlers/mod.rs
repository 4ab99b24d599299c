pub mod auth;
pub mod sweets;

use axum::Json;
use serde_json::json;

pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "sweetshop-server" }))
}
