//! services/api/src/jobs.rs
//!
//! The weekly recommendation sweep. Runs as a background task spawned at
//! startup: sleeps until the next Monday 09:00 UTC, then runs the selector
//! for every registered user.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use tracing::{error, info};

use bookquest_core::ports::BookStore;
use bookquest_core::recommend::{RecommendError, Recommender};

const RUN_WEEKDAY: Weekday = Weekday::Mon;
const RUN_HOUR: u32 = 9;

/// The instant the sweep should fire next, strictly after `now`.
fn next_run_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_ahead = (7 + RUN_WEEKDAY.num_days_from_monday() as i64
        - now.weekday().num_days_from_monday() as i64)
        % 7;
    let candidate = (now.date_naive() + Duration::days(days_ahead))
        .and_hms_opt(RUN_HOUR, 0, 0)
        .expect("fixed wall-clock time is valid")
        .and_utc();

    if candidate > now {
        candidate
    } else {
        candidate + Duration::days(7)
    }
}

/// Runs the selector for every registered user, isolating per-user failures:
/// one user's error is logged and never aborts the rest of the sweep.
pub async fn run_weekly_recommendations(store: &dyn BookStore, recommender: &Recommender) {
    info!("generating weekly recommendations for all users");

    let accounts = match store.list_users().await {
        Ok(accounts) => accounts,
        Err(e) => {
            error!(error = %e, "weekly sweep could not list users");
            return;
        }
    };

    for account in accounts {
        let user = account.user;
        match recommender.select_for_user(user.id).await {
            Ok(books) => {
                info!(user = %user.email, count = books.len(), "weekly recommendations generated")
            }
            Err(RecommendError::NoInterests) => {
                info!(user = %user.email, "skipped: no registered interests")
            }
            Err(e) => error!(user = %user.email, error = %e, "failed to recommend books"),
        }
    }
}

/// Background loop driving the sweep. Spawned once from `main`.
pub async fn weekly_recommendation_loop(store: Arc<dyn BookStore>, recommender: Arc<Recommender>) {
    info!("weekly recommendation job started");

    loop {
        let now = Utc::now();
        let next = next_run_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next_run = %next, "weekly recommendation job sleeping");

        tokio::time::sleep(wait).await;
        run_weekly_recommendations(store.as_ref(), recommender.as_ref()).await;
    }
}
