//! Test helpers: a throwaway upstream served by axum on an ephemeral port.

use crate::core::error::Result;
use axum::{http::HeaderMap, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serves `app` on `127.0.0.1:0` in the background and returns its base URL.
pub async fn spawn_stub_upstream(app: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}/", addr))
}

/// A URL that nothing is listening on.
pub async fn closed_port_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}/", addr))
}

/// Upstream that answers with what it received, as
/// `auth=<header>|message=<userMessage>|context=<context>`.
pub fn echo_upstream() -> Router {
    Router::new().route(
        "/",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let message = body["userMessage"].as_str().unwrap_or_default();
            let context = body["context"].as_str().unwrap_or_default();
            Json(json!({
                "reply": format!("auth={}|message={}|context={}", auth, message, context)
            }))
        }),
    )
}

/// Upstream that always answers `{ "reply": <reply> }`.
pub fn fixed_upstream(reply: &'static str) -> Router {
    Router::new().route("/", post(move || async move { Json(json!({ "reply": reply })) }))
}
