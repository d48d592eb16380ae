//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::token::{self, AuthUser};

/// Middleware that validates the bearer token and extracts the caller.
///
/// A missing or malformed Authorization header is a 401; a token that fails
/// validation (bad signature, expired) is a 403. On success the decoded
/// `AuthUser` is inserted into request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the Authorization header.
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    // 2. Strip the scheme.
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    // 3. Validate the token.
    let claims =
        token::verify(token, &state.config.jwt_secret).map_err(|_| ApiError::InvalidToken)?;

    // 4. Insert the caller into request extensions.
    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });

    // 5. Continue to the handler.
    Ok(next.run(req).await)
}
