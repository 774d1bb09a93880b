use std::sync::Arc;

use anyhow::{Context, Result};
use domain::services::{InMemoryRegistrationStore, RegistrationStore};
use meeting_invite_api::{app, config, middleware, services};
use persistence::repositories::RegistrationRepository;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    middleware::init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting Meeting Invite API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn RegistrationStore> = if config.database.url.is_empty() {
        warn!("No database configured; registrations are kept in memory and lost on restart");
        Arc::new(InMemoryRegistrationStore::new())
    } else {
        let pool = persistence::db::create_pool(&config.database.pool_config())
            .await
            .context("Failed to connect to database")?;

        info!("Running database migrations...");
        persistence::db::run_migrations(&pool).await?;
        info!("Migrations completed");

        Arc::new(RegistrationRepository::new(pool))
    };

    let dispatcher = services::build_dispatcher(&config.email);
    info!(
        mode = %config.meeting.mode,
        meeting = %config.meeting.title,
        provider = dispatcher.provider(),
        "Registration service configured"
    );

    let addr = config.socket_addr()?;
    let app = app::create_app(config, store, dispatcher);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
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
    info!("Shutdown signal received");
}
