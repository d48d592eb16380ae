//! services/api/src/web/interests.rs
//!
//! Endpoint for adding interests to the authenticated user.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::token::AuthUser;
use crate::web::MessageResponse;

#[derive(Deserialize, ToSchema)]
pub struct AddInterestsRequest {
    /// Names from the interest catalog.
    pub interests: Vec<String>,
}

/// POST /interests/add - Associate catalog interests with the caller.
///
/// Already-associated interests are skipped silently.
#[utoipa::path(
    post,
    path = "/interests/add",
    security(("bearer_token" = [])),
    request_body = AddInterestsRequest,
    responses(
        (status = 200, description = "Interests added", body = MessageResponse),
        (status = 400, description = "Empty or invalid interest list"),
        (status = 401, description = "Missing token")
    )
)]
pub async fn add_interests_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<AddInterestsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.interests.is_empty() {
        return Err(ApiError::Validation(
            "at least one interest is required".to_string(),
        ));
    }

    let found = state.store.find_interests_by_names(&req.interests).await?;
    if found.is_empty() {
        return Err(ApiError::Validation("no valid interests found".to_string()));
    }

    let ids: Vec<Uuid> = found.iter().map(|i| i.id).collect();
    state.store.add_user_interests(auth.id, &ids).await?;

    Ok(Json(MessageResponse {
        message: "interests added successfully".to_string(),
    }))
}
