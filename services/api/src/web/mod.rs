//! services/api/src/web/mod.rs
//!
//! The HTTP layer: handlers, auth middleware, shared state, and the master
//! OpenAPI definition.

pub mod auth;
pub mod books;
pub mod interests;
pub mod middleware;
pub mod state;
pub mod token;

pub use middleware::require_auth;

use axum::Json;
use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Generic payload for endpoints that only confirm an action.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::me_handler,
        auth::list_users_handler,
        auth::delete_user_handler,
        interests::add_interests_handler,
        books::recommendations_handler,
        books::user_books_handler,
        books::update_progress_handler,
        health_handler,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::RegisterResponse,
        auth::LoginResponse,
        auth::LoginUser,
        auth::UserSummary,
        auth::ProfileResponse,
        interests::AddInterestsRequest,
        books::BookResponse,
        books::ShelfEntryResponse,
        books::UpdateProgressRequest,
        books::UpdateProgressResponse,
        MessageResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "BookQuest API", description = "Weekly book recommendations and reading-progress tracking.")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// Health
//=========================================================================================

/// GET /health - Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = MessageResponse))
)]
pub async fn health_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "BookQuest API running".to_string(),
    })
}
