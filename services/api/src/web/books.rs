//! services/api/src/web/books.rs
//!
//! Recommendation and reading-progress endpoints.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use bookquest_core::domain::{Book, RecommendedBook};

use crate::error::ApiError;
use crate::web::state::AppState;
use crate::web::token::AuthUser;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub description: String,
    pub link: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            cover_url: book.cover_url,
            description: book.description,
            link: book.link,
        }
    }
}

/// A shelf row: book fields plus the caller's reading state.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShelfEntryResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub description: String,
    pub link: String,
    pub progress: f64,
    pub streak: i32,
    pub created_at: DateTime<Utc>,
}

impl From<RecommendedBook> for ShelfEntryResponse {
    fn from(entry: RecommendedBook) -> Self {
        Self {
            id: entry.book.id,
            title: entry.book.title,
            author: entry.book.author,
            cover_url: entry.book.cover_url,
            description: entry.book.description,
            link: entry.book.link,
            progress: entry.progress,
            streak: entry.streak,
            created_at: entry.created_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub book_id: String,
    pub progress: f64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressResponse {
    pub message: String,
    pub progress: f64,
    pub streak: i32,
    pub last_read_at: DateTime<Utc>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /books/recommendations - Run the selector for the caller.
///
/// Also served at /books/recommendation; the original web client calls the
/// singular path.
#[utoipa::path(
    get,
    path = "/books/recommendations",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Newly recommended books", body = [BookResponse]),
        (status = 400, description = "No interests registered"),
        (status = 404, description = "Nothing new this week"),
        (status = 401, description = "Missing token")
    )
)]
pub async fn recommendations_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.recommender.select_for_user(auth.id).await?;

    // Nothing new is a distinct outcome from the no-interests 400 above.
    if books.is_empty() {
        return Err(ApiError::NotFound(
            "no new recommendations this week".to_string(),
        ));
    }

    Ok(Json(books.into_iter().map(Into::into).collect()))
}

/// GET /books/user-books - The caller's shelf, newest recommendation first.
///
/// An empty shelf triggers a selection run before answering.
#[utoipa::path(
    get,
    path = "/books/user-books",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Recommended books with reading state", body = [ShelfEntryResponse]),
        (status = 400, description = "No interests registered"),
        (status = 401, description = "Missing token")
    )
)]
pub async fn user_books_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ShelfEntryResponse>>, ApiError> {
    let shelf = state.recommender.books_for_user(auth.id).await?;
    Ok(Json(shelf.into_iter().map(Into::into).collect()))
}

/// PUT /books/update-progress - Record reading progress for a linked book.
#[utoipa::path(
    put,
    path = "/books/update-progress",
    security(("bearer_token" = [])),
    request_body = UpdateProgressRequest,
    responses(
        (status = 200, description = "Progress recorded", body = UpdateProgressResponse),
        (status = 400, description = "Invalid progress value"),
        (status = 404, description = "Book is not linked to this user"),
        (status = 401, description = "Missing token")
    )
)]
pub async fn update_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProgressRequest>,
) -> Result<Json<UpdateProgressResponse>, ApiError> {
    let update = state
        .progress
        .update(auth.id, &req.book_id, req.progress)
        .await?;

    Ok(Json(UpdateProgressResponse {
        message: "progress updated successfully".to_string(),
        progress: update.progress,
        streak: update.streak,
        last_read_at: update.last_read_at,
    }))
}
