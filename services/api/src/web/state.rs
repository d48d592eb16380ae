//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use bookquest_core::ports::BookStore;
use bookquest_core::progress::ProgressTracker;
use bookquest_core::recommend::Recommender;

use crate::config::Config;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
    pub recommender: Arc<Recommender>,
    pub progress: Arc<ProgressTracker>,
    pub config: Arc<Config>,
}
