//! Onboarding Success Backend Server
//!
//! HR records, satisfaction surveys and onboarding success predictions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ONBOARDING SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Auth     │  │  Predictor              │ │
//! │  │  (Axum)   │  │  (JWT)    │  │  (onboarding-core)      │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │                ┌─────────────┐                             │
//! │                │ PostgreSQL  │                             │
//! │                └─────────────┘                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod middleware;
mod error;

#[cfg(test)]
mod tests;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use onboarding_core::Predictor;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(config::log_json());

    let config = config::Config::from_env();

    tracing::info!("Onboarding server starting...");
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

    if config.is_production() && config.jwt_secret == config::DEFAULT_JWT_SECRET {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    // Initialize database pool
    let pool = db::create_pool(&config.database_url).await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await
        .context("Failed to run migrations")?;

    handlers::auth::ensure_admin(&pool, &config).await
        .context("Failed to create bootstrap administrator")?;

    // Artifacts are loaded once; a failure leaves the predictor unavailable
    let artifacts = config.to_artifact_config();
    let predictor = tokio::task::spawn_blocking(move || Predictor::load(&artifacts))
        .await
        .context("Predictor load task panicked")?;

    let state = AppState {
        pool,
        config: config.clone(),
        predictor,
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await
        .context("Server error")?;

    Ok(())
}

/// Registers the subscriber; `log` records from the core crate are forwarded
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "onboarding_server=debug,onboarding_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: config::Config,
    pub predictor: Predictor,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    // HR routes (user JWT auth)
    let hr_routes = Router::new()
        // Users
        .route("/api/v1/users", post(handlers::auth::create_user))

        // Employees
        .route("/api/v1/employees", get(handlers::employees::list).post(handlers::employees::create))
        .route("/api/v1/employees/:id", get(handlers::employees::get))
        .route("/api/v1/departments", get(handlers::departments::list))
        .route("/api/v1/integration/statistics", get(handlers::integration::statistics))

        // Surveys
        .route("/api/v1/surveys", get(handlers::surveys::list).post(handlers::surveys::create))

        // Onboarding program
        .route("/api/v1/onboarding", get(handlers::onboarding::list).post(handlers::onboarding::enroll))

        // Predictions
        .route("/api/v1/predictions", get(handlers::predictions::list).post(handlers::predictions::predict))
        .route("/api/v1/model/status", get(handlers::model::status))

        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(hr_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
