use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::utils::auth::validate_jwt;

/// Bearer-token gate for the /files routes. Valid claims are inserted into
/// request extensions for the handlers; everything else is a 401.
pub async fn auth_middleware(
    State(state): State<crate::AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            if let Ok(claims) = validate_jwt(token, &state.config.jwt_secret) {
                req.extensions_mut().insert(claims);
                return Ok(next.run(req).await);
            }
        }
    }

    Err(AppError::Unauthorized(
        "Missing or invalid bearer token".to_string(),
    ))
}
