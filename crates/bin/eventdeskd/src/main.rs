//! # eventdeskd — eventdesk API daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use eventdesk_adapter_http_axum::state::AppState;
use eventdesk_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteEventRepository, SqliteUserRepository,
};
use eventdesk_app::services::event_service::EventService;
use eventdesk_app::services::user_service::UserService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();
    tracing::info!(url = config.database_url(), "database ready");

    // Repositories
    // The event service reads users to check coordinators, so it gets its
    // own handle on the same pool.
    let event_repo = SqliteEventRepository::new(pool.clone());
    let coordinator_repo = SqliteUserRepository::new(pool.clone());
    let user_repo = SqliteUserRepository::new(pool);

    // Services
    let event_service = EventService::new(event_repo, coordinator_repo);
    let user_service = UserService::new(user_repo);

    // HTTP
    let mut state = AppState::new(event_service, user_service);
    if let Some(public_url) = config.public_url() {
        state = state.with_public_url(public_url);
    }
    let app = eventdesk_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, public_url = ?config.public_url(), "eventdeskd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("eventdeskd stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
