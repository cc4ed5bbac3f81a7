//! # Shipsy API Server
//!
//! HTTP server for the Shipsy shipment service: user signup and login with
//! session tokens, and shipment management with server-side pricing.
//!
//! ## Storage
//!
//! With `DATABASE_URL` set, the server creates the database if needed, runs
//! migrations and stores everything in PostgreSQL. Without it, data lives in
//! memory and is lost on restart.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p shipsy-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use shipsy_api::{
    app::{build_app, AppState},
    config::{Config, LogFormat},
};
use shipsy_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{memory::InMemoryStore, postgres::PgStore},
};
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shipsy_api=debug,shipsy_shared=debug,tower_http=debug".into());

    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!(
        "Shipsy API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize storage
    let (state, pool) = match &config.database {
        Some(database) => {
            ensure_database_exists(&database.url)
                .await
                .context("Failed to ensure database exists")?;

            let pool = create_pool(DatabaseConfig {
                url: database.url.clone(),
                max_connections: database.max_connections,
                ..Default::default()
            })
            .await
            .context("Failed to create database pool")?;

            run_migrations(&pool).await.context("Failed to run migrations")?;

            let store = Arc::new(PgStore::new(pool.clone()));
            (AppState::new(config.clone(), store.clone(), store), Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data will not survive a restart");
            let store = Arc::new(InMemoryStore::new());
            (AppState::new(config.clone(), store.clone(), store), None)
        }
    };

    // Build Axum application
    let app = build_app(state);

    // Start server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown(pool).await;
    Ok(())
}

/// Resolves when Ctrl-C is received
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

async fn shutdown(pool: Option<PgPool>) {
    if let Some(pool) = pool {
        close_pool(pool).await;
    }
    tracing::info!("Server stopped");
}
