//! crates/bookquest_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Book, Interest, ReadingEntry, RecommendedBook, User, UserAccount, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Whether a (user, book) link was inserted or was already present.
///
/// The store resolves the race between concurrent recommendation runs with
/// insert-or-ignore semantics; callers treat `AlreadyLinked` as a benign
/// outcome, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait BookStore: Send + Sync {
    // --- User Management ---
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User>;

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    async fn list_users(&self) -> PortResult<Vec<UserAccount>>;

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()>;

    // --- Interests ---
    async fn find_interests_by_names(&self, names: &[String]) -> PortResult<Vec<Interest>>;

    /// Associates interests with a user. Already-present associations are
    /// skipped, not duplicated and not reported as errors.
    async fn add_user_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> PortResult<()>;

    async fn interests_for_user(&self, user_id: Uuid) -> PortResult<Vec<Interest>>;

    // --- Books and Associations ---
    async fn find_book(&self, book_id: &str) -> PortResult<Option<Book>>;

    async fn create_book(&self, book: &Book) -> PortResult<()>;

    /// Links a book to a user with insert-or-ignore semantics on the
    /// (user, book) key.
    async fn link_book(
        &self,
        user_id: Uuid,
        book_id: &str,
        daily_goal: f64,
    ) -> PortResult<LinkOutcome>;

    async fn find_reading_entry(
        &self,
        user_id: Uuid,
        book_id: &str,
    ) -> PortResult<Option<ReadingEntry>>;

    /// The user's recommended books, most recently recommended first.
    async fn books_for_user(&self, user_id: Uuid) -> PortResult<Vec<RecommendedBook>>;

    async fn update_reading_entry(
        &self,
        user_id: Uuid,
        book_id: &str,
        progress: f64,
        streak: i32,
        last_read_at: DateTime<Utc>,
    ) -> PortResult<ReadingEntry>;
}

#[async_trait]
pub trait BookMetadataProvider: Send + Sync {
    /// Looks up at most one candidate book for a category. `Ok(None)` means
    /// the catalog has nothing for that term.
    async fn find_by_category(&self, category: &str) -> PortResult<Option<Book>>;
}

/// Source of the pseudo-random category permutation used by the selector.
/// Injectable so tests can supply a deterministic order.
pub trait CategoryShuffler: Send + Sync {
    fn shuffle(&self, categories: &mut [String]);
}
