//! WrldBldr Bot - Discord front end for TTRPG records
//!
//! The bot:
//! - Rolls dice from slash commands
//! - Creates, edits and shows characters, items and feats through
//!   multi-step wizards built from modals and select menus
//! - Tracks character inventories in SQLite
//! - Serves the stored records read-only over HTTP

mod application;
mod domain;
mod infrastructure;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::discord;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wrldbldr_bot=debug,tower_http=debug,serenity=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting WrldBldr Bot");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Database: {}", config.database_url);
    match config.discord_guild_id {
        Some(guild_id) => tracing::info!("  Commands: guild {}", guild_id),
        None => tracing::info!("  Commands: global"),
    }
    if let Some(timeout) = config.wizard_timeout {
        tracing::info!("  Wizard timeout: {}s", timeout.as_secs());
    }

    // Initialize application state
    let state = Arc::new(AppState::new(config).await?);
    tracing::info!("Application state initialized");

    let mut client = discord::build_client(state.clone()).await?;
    let shard_manager = client.shard_manager.clone();

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        // Merge REST API routes
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(state.shutdown.clone().cancelled_owned());

    // Run the gateway and the server until either stops or Ctrl+C arrives
    tokio::select! {
        result = client.start() => {
            if let Err(e) = result {
                tracing::error!("Discord client error: {}", e);
            }
        }
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    // Abort open wizards, then disconnect
    state.shutdown.cancel();
    shard_manager.shutdown_all().await;
    state.repository.close().await;
    tracing::info!("Stopped");

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
