//! Admin login.

use actix_web::{HttpResponse, web};

use mindstream_infra::auth::ADMIN_ROLE;
use mindstream_shared::dto::{AuthResponse, LoginRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/admin/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let password = body
        .into_inner()
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Password required".to_string()))?;

    let valid = state
        .admin
        .verify_password(&password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::warn!("Rejected admin login");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let token = state
        .tokens
        .generate_token("admin", vec![ADMIN_ROLE.to_string()])
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!("Admin logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    }))
}
