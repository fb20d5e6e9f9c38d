//! # Portfolio Server Command
//!
//! File: cli/src/commands/srv/mod.rs
//!
//! ## Overview
//!
//! `folio srv` runs the portfolio backend: the chat and contact API plus,
//! optionally, the built static site.
//!
//! ## Architecture
//!
//! - `config`: `SrvArgs` and merging them over the `[server]` settings
//! - `contact`: contact form validation
//! - `handlers`: the `/api` request handlers
//! - `server_logic`: router construction, port selection, serving, shutdown
//! - `utils`: startup banner helpers
//!
//! ## Examples
//!
//! ```bash
//! # API only, on the configured port (5000 by default)
//! folio srv
//!
//! # API plus the built site, reachable from the LAN
//! folio srv --site dist/public --host 0.0.0.0 --port 8080
//! ```
//!
use crate::chatbot::service::ChatService;
use crate::core::config::Config;
use crate::core::error::Result;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

pub mod config;
pub mod contact;
pub mod handlers;
pub mod server_logic;
pub mod utils;

/// # Handle Server Command (`handle_srv`)
///
/// Resolves the server configuration, builds the chat service and runs the
/// server until shutdown.
///
/// ## Arguments
///
/// * `args`: Parsed `folio srv` arguments.
/// * `config`: The effective application configuration.
pub async fn handle_srv(args: SrvArgs, config: &Config) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let server_config = config::resolve_server_config(&args, &config.server).await?;
    let chat = Arc::new(ChatService::from_config(config)?);

    server_logic::run_server(server_config, chat).await
}
