pub mod orders;
pub mod payments;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "consult-payments",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
