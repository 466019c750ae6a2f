//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite adapter for record storage
//! - Discord: gateway client, slash commands and the interaction channel
//! - HTTP: read-only REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod discord;
pub mod http;
pub mod persistence;
pub mod state;
