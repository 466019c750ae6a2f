//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://wrldbldr-bot.db";
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bot token from the Discord developer portal
    pub discord_token: String,
    /// Register commands on this guild only. Global registration otherwise.
    pub discord_guild_id: Option<u64>,

    /// SQLite connection URL, created if missing
    pub database_url: String,

    /// Port of the health and read-only JSON API
    pub http_port: u16,

    /// How long a wizard waits for each user action. `None` waits forever.
    pub wizard_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            discord_token: var("DISCORD_TOKEN")
                .context("DISCORD_TOKEN environment variable is required")?,
            discord_guild_id: var("DISCORD_GUILD_ID")
                .map(|id| id.parse())
                .transpose()
                .context("DISCORD_GUILD_ID must be a numeric guild id")?,

            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),

            http_port: var("HTTP_PORT")
                .map(|port| port.parse())
                .transpose()
                .context("HTTP_PORT must be a valid port number")?
                .unwrap_or(DEFAULT_HTTP_PORT),

            wizard_timeout: var("WIZARD_TIMEOUT_SECS")
                .map(|secs| secs.parse().map(Duration::from_secs))
                .transpose()
                .context("WIZARD_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}
