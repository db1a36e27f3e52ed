//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use mindstream_core::ports::StorageHealth;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub storage: Vec<StorageHealth>,
}

/// Health check endpoint - reads both collections and reports whether
/// either backing file was corrupt or unreachable.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let posts_ok = state.posts.list_all().await.is_ok();
    let visitors_ok = state.visitors.list_active().await.is_ok();

    let storage = vec![state.posts.health(), state.visitors.health()];

    let status = if !posts_ok || !visitors_ok {
        "unavailable"
    } else if storage.iter().any(|s| s.corrupt) {
        "degraded"
    } else {
        "ok"
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        storage,
    };

    if status == "unavailable" {
        HttpResponse::ServiceUnavailable().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}
