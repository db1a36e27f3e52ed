//! Visitor presence endpoints.

use actix_web::{HttpResponse, web};

use mindstream_shared::dto::RegisterVisitorRequest;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/visitors - visitors seen in the last 24 hours.
pub async fn list_visitors(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let visitors = state.visitors.list_active().await?;
    Ok(HttpResponse::Ok().json(visitors))
}

/// POST /api/visitors
pub async fn register_visitor(
    state: web::Data<AppState>,
    body: web::Json<RegisterVisitorRequest>,
) -> AppResult<HttpResponse> {
    let name = body
        .into_inner()
        .name
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;

    let visitor = state.visitors.upsert(&name).await?;
    Ok(HttpResponse::Created().json(visitor))
}
