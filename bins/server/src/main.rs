//! CompliHR ID sequencer server.
//!
//! Serves the ID pattern and sequence API over PostgreSQL.

use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use complihr_api::{AppState, create_router};
use complihr_core::sequencing::IdSequencer;
use complihr_db::{IdSequenceRepository, connect_with_config};
use complihr_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "complihr=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_config(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let default_timezone = config
        .sequencing
        .default_timezone
        .parse::<Tz>()
        .unwrap_or_else(|_| {
            warn!(
                timezone = %config.sequencing.default_timezone,
                "Unknown default timezone, using Europe/London"
            );
            chrono_tz::Europe::London
        });

    let store = Arc::new(IdSequenceRepository::new(db));
    let sequencer = IdSequencer::new(store).with_default_timezone(default_timezone);

    let app = create_router(AppState::new(sequencer));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
