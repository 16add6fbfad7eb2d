//! # Reply Proxy Handler
//!
//! File: cli/src/proxy/handler.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The axum handler behind `POST /api/chat`. It does three things:
//!
//! 1. Parses `{ message, pageContent }` from the body, whatever the
//!    `Content-Type` header says.
//! 2. Forwards it through the shared `UpstreamClient`.
//! 3. Answers `200 { reply }`, or `500 { error, details }` for *any* failure.
//!
//! A body that can't be parsed is reported through the same envelope as an
//! upstream failure. Callers cannot tell the causes apart; only the logs can.
//!
use super::upstream::UpstreamClient;
use super::{ErrorEnvelope, ReplyRequest, ReplyResponse};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Shared state handed to the handler by the router.
pub type ProxyState = Arc<UpstreamClient>;

/// # Handle Request (`handle`)
///
/// Maps one `ReplyRequest` to either a `ReplyResponse` or the uniform
/// `ErrorEnvelope`. The full error chain ends up in `details`.
pub async fn handle(
    upstream: &UpstreamClient,
    request: ReplyRequest,
) -> std::result::Result<ReplyResponse, ErrorEnvelope> {
    info!("Received message: {}", request.message);
    debug!("Page content: {}", request.page_content);

    match upstream
        .fetch_reply(&request.message, &request.page_content)
        .await
    {
        Ok(reply) => Ok(ReplyResponse { reply }),
        Err(e) => {
            error!("Failed to fetch reply from {}: {:#}", upstream.endpoint(), e);
            Err(ErrorEnvelope::reply_fetch_failed(format!("{:#}", e)))
        }
    }
}

/// Axum handler for `POST /api/chat`.
pub async fn chat_handler(
    State(upstream): State<ProxyState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let request = match parse_request(body) {
        Ok(request) => request,
        Err(details) => {
            error!("Rejected chat request body: {}", details);
            return failure(ErrorEnvelope::reply_fetch_failed(details));
        }
    };

    match handle(&upstream, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(envelope) => failure(envelope),
    }
}

fn parse_request(
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<ReplyRequest, String> {
    let bytes = body.map_err(|rejection| rejection.body_text())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

fn failure(envelope: ErrorEnvelope) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
}
