use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub scanner: String,
    pub version: String,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    let scanner_ok = state.scanner.health_check().await;

    let status = if db_ok && scanner_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let as_label = |ok: bool| {
        if ok { "connected" } else { "disconnected" }
    };

    (
        status,
        Json(HealthResponse {
            status: if status == StatusCode::OK { "ok" } else { "degraded" }.to_string(),
            database: as_label(db_ok).to_string(),
            scanner: as_label(scanner_ok).to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
