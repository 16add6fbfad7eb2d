//! # PageChat Reply Proxy Server
//!
//! File: cli/src/commands/serve/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `pagechat serve` hosts the reply proxy: `POST /api/chat` forwards the
//! user's message and page context to the upstream conversational API.
//!
//! ## Architecture
//!
//! - `config.rs`: Configuration loading and merging (CLI, `.pagechat.toml`, defaults)
//! - `server_logic.rs`: Router, middleware and the server loop
//!
//! ## Examples
//!
//! ```bash
//! # Forward to the default upstream, key taken from $GEMINI_API_KEY
//! pagechat serve
//!
//! # Custom upstream and port, serving the host page from ./public
//! pagechat serve --upstream-url http://localhost:9000/chat --port 3000 --static-dir ./public
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

/// Handles configuration loading and merging for the reply proxy.
pub mod config;

/// Contains the Axum-based HTTP server implementation.
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Loads the effective configuration and runs the server until shutdown.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let config = config::load_and_merge_config(args).await?;
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config).await?;

    Ok(())
}
