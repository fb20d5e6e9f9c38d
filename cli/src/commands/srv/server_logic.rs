//! # HTTP Server Implementation
//!
//! File: cli/src/commands/srv/server_logic.rs
//!
//! ## Overview
//!
//! Runs the portfolio backend for `folio srv`:
//! - JSON API under `/api` (chat, contact, health)
//! - Static site from the configured directory for every other path
//! - Port availability checking with automatic fallback
//! - Permissive CORS unless disabled
//! - Graceful shutdown on Ctrl+C or SIGTERM
//!
//! ## Architecture
//!
//! 1. Find an available port, starting at the configured one
//! 2. Build the Axum router with `create_app`
//! 3. Print connection information
//! 4. Serve until a shutdown signal arrives
//!
//! ## Examples
//!
//! ```rust
//! let config = config::resolve_server_config(&args, &settings.server).await?;
//! let chat = Arc::new(ChatService::from_config(&settings)?);
//! server_logic::run_server(config, chat).await?;
//! ```
//!
use super::config::ServerConfig;
use super::handlers::{self, AppState};
use super::utils;
use crate::chatbot::service::ChatService;
use crate::core::error::Result;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Run HTTP Server (`run_server`)
///
/// Binds the first free port at or after `config.port` and serves the API
/// and site until Ctrl+C or SIGTERM.
///
/// ## Arguments
///
/// * `config`: The resolved `ServerConfig`.
/// * `chat`: The chat service shared by all request handlers.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` after a graceful shutdown.
///
/// ## Errors
///
/// - No free port within `MAX_PORT_ATTEMPTS` attempts.
/// - Binding the listener fails.
/// - The server itself fails.
pub async fn run_server(config: ServerConfig, chat: Arc<ChatService>) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let llm_enabled = chat.llm_enabled();
    let app = create_app(&config, AppState { chat });

    println!("\n=================================================================");
    match &config.site_dir {
        Some(dir) => println!("📂 Serving site from: {}", dir.display()),
        None => println!("📂 No site directory configured; serving the API only."),
    }
    println!("🌐 Local URL:         {}", utils::local_url(addr.ip(), addr.port()));
    if addr.ip().is_unspecified() {
        if let Some(ip) = utils::get_local_ip() {
            println!("🔗 Network URL:       http://{}:{}", ip, addr.port());
        }
    }
    println!("⚙️  Binding to address: {}", addr);
    println!("💬 Chat backend:      {}", if llm_enabled { "LLM with rule fallback" } else { "rules" });
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then each following port, up to `max_attempts` ports.
///
/// ## Returns
///
/// * `Result<SocketAddr>`: The first address that could be bound.
async fn find_available_port(req_host: IpAddr, start_port: u16, max_attempts: u8) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, using port {} instead.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable ({}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(port) => port,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// Mounts the API under `/api` and, when a site directory is configured,
/// serves it for every other path. Unknown site paths get `index.html` so
/// client-side routes load the single-page app.
///
/// ## Arguments
///
/// * `config`: The resolved server configuration.
/// * `state`: Handler state holding the chat service.
///
/// ## Returns
///
/// * `Router`: The configured router, with tracing and CORS layers applied.
pub fn create_app(config: &ServerConfig, state: AppState) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/contact", post(handlers::contact))
        .route("/health", get(handlers::health));

    let mut app = Router::new().nest("/api", api);
    if let Some(dir) = &config.site_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(ServiceBuilder::new().layer(trace_layer).layer(cors_layer))
        .with_state(state)
}
