//! crates/bookquest_core/src/progress.rs
//!
//! The progress tracker: records a reading-progress submission and credits
//! the streak when the daily goal is met for the first time that day.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::ProgressUpdate;
use crate::ports::{BookStore, PortError};

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Rejected before any read or write against the store.
    #[error("progress must be a non-negative number")]
    InvalidProgress,
    #[error("book is not linked to this user")]
    NotLinked,
    #[error(transparent)]
    Port(#[from] PortError),
}

pub struct ProgressTracker {
    store: Arc<dyn BookStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Persists a new progress value and recomputes the streak.
    ///
    /// The streak is credited at most once per UTC calendar day, and only
    /// when the submitted progress reaches the entry's daily goal. It never
    /// decays on missed days.
    pub async fn update(
        &self,
        user_id: Uuid,
        book_id: &str,
        new_progress: f64,
    ) -> Result<ProgressUpdate, ProgressError> {
        if !new_progress.is_finite() || new_progress < 0.0 {
            return Err(ProgressError::InvalidProgress);
        }

        let entry = self
            .store
            .find_reading_entry(user_id, book_id)
            .await?
            .ok_or(ProgressError::NotLinked)?;

        let now = Utc::now();
        let already_credited_today = entry
            .last_read_at
            .is_some_and(|t| t.date_naive() == now.date_naive());

        let mut streak = entry.streak;
        if new_progress >= entry.daily_goal && !already_credited_today {
            streak += 1;
        }

        let updated = self
            .store
            .update_reading_entry(user_id, book_id, new_progress, streak, now)
            .await?;

        Ok(ProgressUpdate {
            progress: updated.progress,
            streak: updated.streak,
            last_read_at: updated.last_read_at.unwrap_or(now),
        })
    }
}
