//! crates/bookquest_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered reader.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for registration/login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A user together with the names of the interests they opted into.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub interests: Vec<String>,
}

/// A named category a user can opt into (e.g. "Ficção"), used as the query
/// term against the metadata provider.
#[derive(Debug, Clone)]
pub struct Interest {
    pub id: Uuid,
    pub name: String,
}

/// A book as surfaced by the metadata provider. The provider's volume id is
/// reused as the primary key, so book rows are shared across users.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub description: String,
    pub link: String,
}

/// Per-user reading state layered on top of a shared [`Book`] row.
///
/// `daily_goal` is always populated; the default is bound when the row is
/// created, never at read time.
#[derive(Debug, Clone)]
pub struct ReadingEntry {
    pub user_id: Uuid,
    pub book_id: String,
    pub progress: f64,
    pub daily_goal: f64,
    pub streak: i32,
    pub last_read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A recommended book joined with the user's reading state, as served by
/// the read path.
#[derive(Debug, Clone)]
pub struct RecommendedBook {
    pub book: Book,
    pub progress: f64,
    pub streak: i32,
    pub created_at: DateTime<Utc>,
}

/// The outcome of a progress submission.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub progress: f64,
    pub streak: i32,
    pub last_read_at: DateTime<Utc>,
}
