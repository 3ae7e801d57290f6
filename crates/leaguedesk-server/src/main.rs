//! leaguedesk - league administration API.
//!
//! Serves the admin back end: rosters, drafts, staff assignment,
//! waitlist, player edits, tryout sheet PDFs and reports.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use leaguedesk_core::identity::AuthServiceClient;
use leaguedesk_core::{db, Config, League, SeasonCache};
use leaguedesk_server::{router, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let _log_guard = telemetry::init_tracing(config.log_dir.as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "leaguedesk starting");

    let pool = db::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    db::migrate(&pool).await.context("Failed to create schema")?;

    let sessions = AuthServiceClient::new(config.auth_service_url.clone())
        .context("Failed to build auth service client")?;
    let state = AppState::new(
        League::with_db_audit(pool.clone()),
        Arc::new(sessions),
        Arc::new(SeasonCache::new(config.season_cache_ttl())),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, auth = %config.auth_service_url, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    pool.close().await;
    info!("leaguedesk shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
