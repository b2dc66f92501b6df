//! HTTP surface of the FuelTrack web app.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (no auth required)
//! - `GET /login`, `POST /login`: Log in with username and password
//! - `GET /register`, `POST /register`: Create an account and log in
//! - `GET /logout`: End the current session
//! - `GET /`: Today's meals and nutrition stats (auth required)
//! - `POST /add`: Log a meal (auth required)
//! - `GET /reset`, `POST /reset`: Delete all of your meals (auth required)

pub mod auth;
pub mod error;
pub mod routes;

pub use auth::{require_session, SESSION_COOKIE};
pub use error::AppError;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use fueltrack_core::{AuthGate, MealStore, SessionStore, UserStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
    pub meals: Arc<MealStore>,
}

impl AppState {
    pub fn new(gate: AuthGate, meals: MealStore) -> Self {
        Self {
            gate: Arc::new(gate),
            meals: Arc::new(meals),
        }
    }

    /// Builds the stores in the configured data directory.
    pub fn from_config(config: &Config) -> Self {
        let gate = AuthGate::new(
            UserStore::in_dir(&config.data_dir),
            SessionStore::new(config.session_ttl_minutes),
        );
        Self::new(gate, MealStore::in_dir(&config.data_dir))
    }
}

/// Builds the router with public and session-protected routes.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/login", get(routes::login_form).post(routes::login))
        .route("/register", get(routes::register_form).post(routes::register))
        .route("/logout", get(routes::logout));

    let protected_routes = Router::new()
        .route("/", get(routes::dashboard))
        .route("/add", post(routes::add_meal))
        .route("/reset", get(routes::reset).post(routes::reset))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until the process exits.
pub async fn serve(config: &Config) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!("Data directory: {}", config.data_dir.display());

    let app = router(AppState::from_config(config));

    let addr = config.socket_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
