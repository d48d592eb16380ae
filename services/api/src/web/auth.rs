//! services/api/src/web/auth.rs
//!
//! Account endpoints: registration, login, profile, user listing and
//! deletion.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use bookquest_core::ports::PortError;

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::token::{self, AuthUser};
use crate::web::MessageResponse;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Names from the interest catalog to associate at signup.
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(Serialize, ToSchema)]
pub struct LoginUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub interests: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub interests: Vec<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new account with optional interests.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = RegisterResponse),
        (status = 400, description = "Duplicate email or no valid interests"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "name, email and password are required".to_string(),
        ));
    }

    // 1. Reject duplicate emails up front; the unique constraint backs this
    // under concurrent registrations.
    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Conflict("email is already registered".to_string()));
    }

    // 2. Resolve the interest list before creating anything.
    let interests = if req.interests.is_empty() {
        Vec::new()
    } else {
        let found = state.store.find_interests_by_names(&req.interests).await?;
        if found.is_empty() {
            return Err(ApiError::Validation("no valid interests found".to_string()));
        }
        found
    };

    // 3. Hash the password.
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))?
        .to_string();

    // 4. Create the user. Losing the race on the unique email is still a 400.
    let user = match state
        .store
        .create_user(&req.name, &req.email, &password_hash)
        .await
    {
        Ok(user) => user,
        Err(PortError::Conflict(_)) => {
            return Err(ApiError::Conflict("email is already registered".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    // 5. Associate the interests.
    if !interests.is_empty() {
        let ids: Vec<Uuid> = interests.iter().map(|i| i.id).collect();
        state.store.add_user_interests(user.id, &ids).await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered successfully".to_string(),
            user: UserSummary {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

/// POST /auth/login - Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // 1. Look up the account. An unknown email gets the same answer as a
    // wrong password.
    let creds = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("incorrect email or password".to_string()))?;

    // 2. Verify the password.
    let parsed_hash = PasswordHash::new(&creds.password_hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash is unreadable: {e}")))?;
    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();
    if !valid {
        return Err(ApiError::Unauthorized(
            "incorrect email or password".to_string(),
        ));
    }

    // 3. Issue the token.
    let token = token::issue(creds.id, &creds.email, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))?;

    let interests = state
        .store
        .interests_for_user(creds.id)
        .await?
        .into_iter()
        .map(|i| i.name)
        .collect();

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: creds.id,
            name: creds.name,
            email: creds.email,
            interests,
        },
    }))
}

/// GET /auth/me - The authenticated user's profile.
#[utoipa::path(
    get,
    path = "/auth/me",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Profile with interests", body = ProfileResponse),
        (status = 401, description = "Missing token"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.store.get_user(auth.id).await?;
    let interests = state
        .store
        .interests_for_user(auth.id)
        .await?
        .into_iter()
        .map(|i| i.name)
        .collect();

    Ok(Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
        interests,
    }))
}

/// GET /auth/users - Every registered user with their interests.
#[utoipa::path(
    get,
    path = "/auth/users",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "All users", body = [ProfileResponse]),
        (status = 401, description = "Missing token")
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Extension(_auth): Extension<AuthUser>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let accounts = state.store.list_users().await?;
    Ok(Json(
        accounts
            .into_iter()
            .map(|account| ProfileResponse {
                id: account.user.id,
                name: account.user.name,
                email: account.user.email,
                created_at: account.user.created_at,
                interests: account.interests,
            })
            .collect(),
    ))
}

/// DELETE /auth/users/{id} - Remove a user; the store cascades associations.
#[utoipa::path(
    delete,
    path = "/auth/users/{id}",
    security(("bearer_token" = [])),
    params(("id" = Uuid, Path, description = "The user to delete")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(_auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_user(id).await?;
    Ok(Json(MessageResponse {
        message: "user deleted successfully".to_string(),
    }))
}
