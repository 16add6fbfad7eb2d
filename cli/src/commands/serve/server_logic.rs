//! # PageChat HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module runs the reply proxy over HTTP:
//! - `POST /api/chat`: the proxy route (`crate::proxy::handler`)
//! - `GET /health`: liveness probe
//! - everything else: the optional static directory (the host page)
//!
//! ## Architecture
//!
//! The server implementation uses Axum and follows these steps:
//! 1. Build the shared `UpstreamClient` from the configuration
//! 2. Find an available port if the requested one is in use
//! 3. Set up the router with tracing and CORS middleware
//! 4. Serve until Ctrl+C / SIGTERM, then shut down gracefully
//!
//! Requests share nothing but the immutable upstream client; concurrent
//! requests are simply handled concurrently by the runtime.
//!
use super::config::ServerConfig;
use crate::core::error::Result;
use crate::proxy::{handler, upstream::UpstreamClient, CHAT_ROUTE};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// Route for the liveness probe.
pub const HEALTH_ROUTE: &str = "/health";

/// # Run HTTP Server (`run_server`)
///
/// Starts the reply proxy according to `config` and serves until a shutdown
/// signal arrives.
///
/// ## Errors
///
/// This function can return errors if:
/// - The upstream HTTP client cannot be built.
/// - No port can be bound within the allowed attempts.
/// - The Axum server itself encounters a fatal error.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let upstream = UpstreamClient::new(&config.upstream_url, &config.api_key_env, config.timeout())?;

    let max_port_attempts = 10;
    let listener = find_available_port(config.host, config.port, max_port_attempts).await?;
    let addr = listener
        .local_addr()
        .context("Failed to read the bound address")?;

    let app = create_app(&config, upstream);

    println!("\n=================================================================");
    println!("💬 Reply proxy:       http://{}{}", addr, CHAT_ROUTE);
    println!("➡️  Upstream:          {}", config.upstream_url);
    println!("🔑 Credential from:   ${}", config.api_key_env);
    if let Some(dir) = &config.static_dir {
        println!("📂 Serving files from: {}", dir.display());
    }
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    if std::env::var(&config.api_key_env).is_err() {
        warn!(
            "{} is not set; upstream calls will be unauthenticated",
            config.api_key_env
        );
    }

    info!("Starting reply proxy on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    serve_until(listener, app, shutdown_signal()).await?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Serves `app` on `listener` until `shutdown` resolves, then lets in-flight
/// requests finish.
async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;
    Ok(())
}

/// Resolves when Ctrl+C or (on Unix) SIGTERM is received.
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
/// Tries `start_port` and up to `max_attempts - 1` following ports, returning
/// the listener bound to the first one that is free.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<TcpListener> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if attempt > 0 {
                    warn!(
                        "Port {} was unavailable, using port {} instead. Point the widget at the new port.",
                        start_port, current_port
                    );
                }
                return Ok(listener);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = current_port.saturating_add(1);
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

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router: the proxy route, the health probe, the optional static
/// directory as fallback, and the tracing/CORS middleware.
pub fn create_app(config: &ServerConfig, upstream: UpstreamClient) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let mut router = Router::new()
        .route(CHAT_ROUTE, post(handler::chat_handler))
        .route(HEALTH_ROUTE, get(health))
        .with_state(Arc::new(upstream));

    if let Some(dir) = &config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::testing;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use std::net::Ipv4Addr;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_config() -> ServerConfig {
        ServerConfig {
            api_key_env: "PAGECHAT_TEST_KEY_NEVER_SET".into(),
            ..ServerConfig::default()
        }
    }

    async fn body_string(response: axum::response::Response) -> Result<String> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 50100;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;

        assert_eq!(addr.port(), start_port);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 51100;

        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;

        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port + 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_chat_route_proxies_reply() -> Result<()> {
        let url = testing::spawn_stub_upstream(testing::fixed_upstream("hi")).await?;
        let config = ServerConfig {
            upstream_url: url.clone(),
            ..test_config()
        };
        let app = create_app(&config, UpstreamClient::new(&url, &config.api_key_env, None)?);

        let request = Request::builder()
            .method("POST")
            .uri(CHAT_ROUTE)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message":"hello","pageContent":""}"#))?;
        let response = app.oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await?, r#"{"reply":"hi"}"#);
        Ok(())
    }

    #[tokio::test]
    async fn test_health_route() -> Result<()> {
        let config = test_config();
        let app = create_app(&config, UpstreamClient::new(&config.upstream_url, &config.api_key_env, None)?);

        let request = Request::builder().uri(HEALTH_ROUTE).body(Body::empty())?;
        let response = app.oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await?, r#"{"status":"ok"}"#);
        Ok(())
    }

    #[tokio::test]
    async fn test_static_dir_is_served() -> Result<()> {
        let temp_dir = TempDir::new()?;
        tokio::fs::write(temp_dir.path().join("index.html"), "<html>Events</html>").await?;
        let config = ServerConfig {
            static_dir: Some(temp_dir.path().to_path_buf()),
            ..test_config()
        };
        let app = create_app(&config, UpstreamClient::new(&config.upstream_url, &config.api_key_env, None)?);

        let request = Request::builder().uri("/index.html").body(Body::empty())?;
        let response = app.oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await?, "<html>Events</html>");
        Ok(())
    }

    #[tokio::test]
    async fn test_cors_headers_when_enabled() -> Result<()> {
        let config = test_config();
        let app = create_app(&config, UpstreamClient::new(&config.upstream_url, &config.api_key_env, None)?);

        let request = Request::builder()
            .uri(HEALTH_ROUTE)
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())?;
        let response = app.oneshot(request).await?;

        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        Ok(())
    }

    #[tokio::test]
    async fn test_found_port_stays_bound() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 52100;

        let listener = find_available_port(host, start_port, 5).await?;
        let addr = listener.local_addr()?;

        assert!(TcpListener::bind(addr).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_graceful_shutdown() -> Result<()> {
        let config = test_config();
        let app = create_app(&config, UpstreamClient::new(&config.upstream_url, &config.api_key_env, None)?);
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve_until(listener, app, async {
            let _ = stop_rx.await;
        }));

        let health = reqwest::get(format!("http://{}{}", addr, HEALTH_ROUTE)).await?;
        assert_eq!(health.status(), reqwest::StatusCode::OK);
        assert_eq!(health.text().await?, r#"{"status":"ok"}"#);

        let _ = stop_tx.send(());
        tokio::time::timeout(std::time::Duration::from_secs(5), server).await???;

        assert!(reqwest::get(format!("http://{}{}", addr, HEALTH_ROUTE))
            .await
            .is_err());
        Ok(())
    }
}
