//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `BookStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use bookquest_core::domain::{
    Book, Interest, ReadingEntry, RecommendedBook, User, UserAccount, UserCredentials,
};
use bookquest_core::ports::{BookStore, LinkOutcome, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `BookStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct InterestRecord {
    id: Uuid,
    name: String,
}
impl InterestRecord {
    fn to_domain(self) -> Interest {
        Interest {
            id: self.id,
            name: self.name,
        }
    }
}

#[derive(FromRow)]
struct BookRecord {
    id: String,
    title: String,
    author: String,
    cover_url: String,
    description: String,
    link: String,
}
impl BookRecord {
    fn to_domain(self) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            cover_url: self.cover_url,
            description: self.description,
            link: self.link,
        }
    }
}

#[derive(FromRow)]
struct ReadingEntryRecord {
    user_id: Uuid,
    book_id: String,
    progress: f64,
    daily_goal: f64,
    streak: i32,
    last_read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}
impl ReadingEntryRecord {
    fn to_domain(self) -> ReadingEntry {
        ReadingEntry {
            user_id: self.user_id,
            book_id: self.book_id,
            progress: self.progress,
            daily_goal: self.daily_goal,
            streak: self.streak,
            last_read_at: self.last_read_at,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ShelfRecord {
    id: String,
    title: String,
    author: String,
    cover_url: String,
    description: String,
    link: String,
    progress: f64,
    streak: i32,
    created_at: DateTime<Utc>,
}
impl ShelfRecord {
    fn to_domain(self) -> RecommendedBook {
        RecommendedBook {
            book: Book {
                id: self.id,
                title: self.title,
                author: self.author,
                cover_url: self.cover_url,
                description: self.description,
                link: self.link,
            },
            progress: self.progress,
            streak: self.streak,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct UserInterestNameRecord {
    user_id: Uuid,
    name: String,
}

//=========================================================================================
// `BookStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookStore for PgStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict(format!("email {email} is already registered"))
            } else {
                unexpected(e)
            }
        })?;

        Ok(record.to_domain())
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(CredentialsRecord::to_domain))
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {user_id} not found")),
            _ => unexpected(e),
        })?;

        Ok(record.to_domain())
    }

    async fn list_users(&self) -> PortResult<Vec<UserAccount>> {
        let users = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        // One extra query instead of one per user.
        let names = sqlx::query_as::<_, UserInterestNameRecord>(
            "SELECT ui.user_id, i.name FROM user_interests ui
             JOIN interests i ON i.id = ui.interest_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut by_user: HashMap<Uuid, Vec<String>> = HashMap::new();
        for record in names {
            by_user.entry(record.user_id).or_default().push(record.name);
        }

        Ok(users
            .into_iter()
            .map(|record| {
                let interests = by_user.remove(&record.id).unwrap_or_default();
                UserAccount {
                    user: record.to_domain(),
                    interests,
                }
            })
            .collect())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }

    async fn find_interests_by_names(&self, names: &[String]) -> PortResult<Vec<Interest>> {
        let records = sqlx::query_as::<_, InterestRecord>(
            "SELECT id, name FROM interests WHERE name = ANY($1)",
        )
        .bind(names.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(InterestRecord::to_domain).collect())
    }

    async fn add_user_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> PortResult<()> {
        for interest_id in interest_ids {
            sqlx::query(
                "INSERT INTO user_interests (user_id, interest_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(interest_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        }
        Ok(())
    }

    async fn interests_for_user(&self, user_id: Uuid) -> PortResult<Vec<Interest>> {
        let records = sqlx::query_as::<_, InterestRecord>(
            "SELECT i.id, i.name FROM interests i
             JOIN user_interests ui ON ui.interest_id = i.id
             WHERE ui.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(InterestRecord::to_domain).collect())
    }

    async fn find_book(&self, book_id: &str) -> PortResult<Option<Book>> {
        let record = sqlx::query_as::<_, BookRecord>(
            "SELECT id, title, author, cover_url, description, link FROM books WHERE id = $1",
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(BookRecord::to_domain))
    }

    async fn create_book(&self, book: &Book) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO books (id, title, author, cover_url, description, link)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.cover_url)
        .bind(&book.description)
        .bind(&book.link)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict(format!("book {} already exists", book.id))
            } else {
                unexpected(e)
            }
        })?;

        Ok(())
    }

    async fn link_book(
        &self,
        user_id: Uuid,
        book_id: &str,
        daily_goal: f64,
    ) -> PortResult<LinkOutcome> {
        // Insert-or-ignore on the composite key: losing the race with a
        // concurrent recommendation run is the same as "already linked".
        let result = sqlx::query(
            "INSERT INTO user_books (user_id, book_id, daily_goal) VALUES ($1, $2, $3)
             ON CONFLICT (user_id, book_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(daily_goal)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 1 {
            Ok(LinkOutcome::Linked)
        } else {
            Ok(LinkOutcome::AlreadyLinked)
        }
    }

    async fn find_reading_entry(
        &self,
        user_id: Uuid,
        book_id: &str,
    ) -> PortResult<Option<ReadingEntry>> {
        let record = sqlx::query_as::<_, ReadingEntryRecord>(
            "SELECT user_id, book_id, progress, daily_goal, streak, last_read_at, created_at
             FROM user_books WHERE user_id = $1 AND book_id = $2",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(ReadingEntryRecord::to_domain))
    }

    async fn books_for_user(&self, user_id: Uuid) -> PortResult<Vec<RecommendedBook>> {
        let records = sqlx::query_as::<_, ShelfRecord>(
            "SELECT b.id, b.title, b.author, b.cover_url, b.description, b.link,
                    ub.progress, ub.streak, ub.created_at
             FROM user_books ub
             JOIN books b ON b.id = ub.book_id
             WHERE ub.user_id = $1
             ORDER BY ub.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(ShelfRecord::to_domain).collect())
    }

    async fn update_reading_entry(
        &self,
        user_id: Uuid,
        book_id: &str,
        progress: f64,
        streak: i32,
        last_read_at: DateTime<Utc>,
    ) -> PortResult<ReadingEntry> {
        let record = sqlx::query_as::<_, ReadingEntryRecord>(
            "UPDATE user_books SET progress = $3, streak = $4, last_read_at = $5
             WHERE user_id = $1 AND book_id = $2
             RETURNING user_id, book_id, progress, daily_goal, streak, last_read_at, created_at",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(progress)
        .bind(streak)
        .bind(last_read_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("no reading entry for book {book_id}"))
            }
            _ => unexpected(e),
        })?;

        Ok(record.to_domain())
    }
}
