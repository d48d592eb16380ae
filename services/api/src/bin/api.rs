//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{db::PgStore, google_books::GoogleBooks, shuffle::ThreadRngShuffler},
    config::Config,
    error::ApiError,
    jobs,
    web::{
        auth::{
            delete_user_handler, list_users_handler, login_handler, me_handler, register_handler,
        },
        books::{recommendations_handler, update_progress_handler, user_books_handler},
        health_handler,
        interests::add_interests_handler,
        middleware::require_auth,
        state::AppState,
        ApiDoc,
    },
};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use bookquest_core::{
    ports::BookStore,
    progress::ProgressTracker,
    recommend::Recommender,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let pg_store = Arc::new(PgStore::new(db_pool.clone()));
    info!("Running database migrations...");
    pg_store.run_migrations().await?;
    info!("Database migrations complete.");
    let store: Arc<dyn BookStore> = pg_store;

    // --- 3. Initialize Adapters & Core Services ---
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| ApiError::Internal(format!("failed to build HTTP client: {e}")))?;
    let provider = Arc::new(GoogleBooks::new(
        http_client,
        config.google_books_base_url.clone(),
        config.google_books_lang.clone(),
    ));

    let recommender = Arc::new(Recommender::new(
        store.clone(),
        provider,
        Arc::new(ThreadRngShuffler),
        config.default_daily_goal,
    ));
    let progress = Arc::new(ProgressTracker::new(store.clone()));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store: store.clone(),
        recommender: recommender.clone(),
        progress,
        config: config.clone(),
    });

    // --- 5. Spawn the Weekly Recommendation Job ---
    tokio::spawn(jobs::weekly_recommendation_loop(store, recommender));

    // --- 6. Create the Web Router ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/auth/users", get(list_users_handler))
        .route("/auth/users/{id}", delete(delete_user_handler))
        .route("/interests/add", post(add_interests_handler))
        // The original web client calls the singular path; serve both.
        .route("/books/recommendation", get(recommendations_handler))
        .route("/books/recommendations", get(recommendations_handler))
        .route("/books/user-books", get(user_books_handler))
        .route("/books/update-progress", put(update_progress_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 7. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
