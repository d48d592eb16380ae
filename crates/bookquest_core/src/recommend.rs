//! crates/bookquest_core/src/recommend.rs
//!
//! The recommendation selector: samples candidate categories from a user's
//! interests and links whichever books the metadata provider surfaces that
//! the user has not been given before.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::domain::{Book, RecommendedBook};
use crate::ports::{BookMetadataProvider, BookStore, CategoryShuffler, LinkOutcome, PortError};

/// Upper bound on candidate categories and on books handed out per run.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// The user exists but has no interest associations; callers report this
    /// differently from a run that simply found nothing new.
    #[error("user has no registered interests")]
    NoInterests,
    #[error(transparent)]
    Port(#[from] PortError),
}

pub struct Recommender {
    store: Arc<dyn BookStore>,
    provider: Arc<dyn BookMetadataProvider>,
    shuffler: Arc<dyn CategoryShuffler>,
    default_daily_goal: f64,
}

impl Recommender {
    pub fn new(
        store: Arc<dyn BookStore>,
        provider: Arc<dyn BookMetadataProvider>,
        shuffler: Arc<dyn CategoryShuffler>,
        default_daily_goal: f64,
    ) -> Self {
        Self {
            store,
            provider,
            shuffler,
            default_daily_goal,
        }
    }

    /// Selects up to [`MAX_RECOMMENDATIONS`] books the user has not been
    /// recommended before.
    ///
    /// Returns only the newly linked books. An empty result means the
    /// sampled categories yielded nothing new this run, which is a normal
    /// outcome once the interest pool is exhausted of novel matches.
    pub async fn select_for_user(&self, user_id: Uuid) -> Result<Vec<Book>, RecommendError> {
        let interests = self.store.interests_for_user(user_id).await?;
        if interests.is_empty() {
            return Err(RecommendError::NoInterests);
        }

        let mut categories: Vec<String> = interests.into_iter().map(|i| i.name).collect();
        self.shuffler.shuffle(&mut categories);
        categories.truncate(MAX_RECOMMENDATIONS);

        let mut picked = Vec::new();
        for category in &categories {
            let candidate = match self.provider.find_by_category(category).await {
                Ok(Some(book)) => book,
                Ok(None) => continue,
                Err(e) => {
                    // Provider trouble never fails the whole run.
                    warn!(category = %category, error = %e, "metadata lookup failed, skipping category");
                    continue;
                }
            };

            if self.store.find_book(&candidate.id).await?.is_none() {
                match self.store.create_book(&candidate).await {
                    Ok(()) => {}
                    // Lost the insert race: the row exists now, which is all we need.
                    Err(PortError::Conflict(_)) => {}
                    Err(e) => return Err(e.into()),
                }
            }

            match self
                .store
                .link_book(user_id, &candidate.id, self.default_daily_goal)
                .await?
            {
                LinkOutcome::Linked => picked.push(candidate),
                LinkOutcome::AlreadyLinked => {}
            }

            if picked.len() >= MAX_RECOMMENDATIONS {
                break;
            }
        }

        Ok(picked)
    }

    /// The read path: the user's recommended books, newest first.
    ///
    /// An empty shelf falls back to a selection run and re-reads, so a
    /// first-time reader gets content instead of an empty page. The
    /// coupling is deliberate; `NoInterests` surfaces through this path
    /// exactly as it does through [`Self::select_for_user`].
    pub async fn books_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RecommendedBook>, RecommendError> {
        let shelf = self.store.books_for_user(user_id).await?;
        if !shelf.is_empty() {
            return Ok(shelf);
        }

        self.select_for_user(user_id).await?;
        Ok(self.store.books_for_user(user_id).await?)
    }
}
