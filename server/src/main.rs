//! VibeSync server binary.
//!
//! # Usage
//!
//! ```bash
//! SPOTIFY_CLIENT_ID=... SPOTIFY_CLIENT_SECRET=... APP_URL=http://localhost:9002 \
//! ANTHROPIC_API_KEY=... cargo run --bin vibesync-server
//! ```

use anyhow::Context;
use std::sync::Arc;
use vibesync_auth::providers::{HttpResourceTransport, SpotifyOAuthClient};
use vibesync_auth::stores::CookieSessionStore;
use vibesync_auth::{AuthEnvironment, SessionManager};
use vibesync_recommend::ClaudeRecommender;
use vibesync_server::telemetry::init_tracing;
use vibesync_server::{AppState, Config, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.log_format)?;

    tracing::info!(
        address = %config.listen.address(),
        app_url = ?config.oauth.app_url,
        spotify_configured = config.oauth.client_id.is_some() && config.oauth.client_secret.is_some(),
        recommender_configured = config.recommender.api_key.is_some(),
        secure_cookies = config.cookies.secure,
        "Configuration loaded"
    );
    if config.oauth.app_url.is_none() {
        tracing::warn!("APP_URL not set, login will fail until it is configured");
    }

    let oauth_client = SpotifyOAuthClient::new(config.oauth.clone())?;
    let transport = HttpResourceTransport::new(&config.oauth)?;
    let store = CookieSessionStore::new(config.cookies.clone());
    let manager = SessionManager::new(
        config.oauth.clone(),
        AuthEnvironment::new(oauth_client, store, transport),
    );
    let recommender = ClaudeRecommender::new(config.recommender.clone())?;

    let state = AppState::new(Arc::new(manager), config.cookie_key(), Arc::new(recommender));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen.address())
        .await
        .with_context(|| format!("failed to bind {}", config.listen.address()))?;
    tracing::info!(address = %config.listen.address(), "VibeSync server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
