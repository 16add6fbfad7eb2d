//! # PageChat Reply Proxy
//!
//! File: cli/src/proxy/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The reply proxy accepts `{ message, pageContent }` over HTTP, forwards it to
//! an external conversational API as `{ userMessage, context }`, and hands the
//! upstream's `reply` back to the caller. It is stateless: no retries, no
//! caching, no conversation memory.
//!
//! ## Architecture
//!
//! - this file: the wire types on both sides of the proxy.
//! - `upstream`: the `reqwest` client that talks to the external API.
//! - `handler`: the axum handler for `POST /api/chat` and the
//!   request-to-response mapping (`handle`).
//!
//! Every failure, whatever its cause, reaches the caller as the same
//! `ErrorEnvelope` with a 500 status. The underlying message travels in
//! `details`.
//!
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod handler;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;

/// Route the proxy is mounted on.
pub const CHAT_ROUTE: &str = "/api/chat";

/// The one error message callers ever see.
pub const REPLY_FETCH_FAILED: &str = "Failed to fetch the bot reply.";

/// Inbound request body. Missing fields are treated as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub page_content: String,
}

/// Successful response body.
///
/// `reply` is whatever the upstream put in its own `reply` field, unchecked.
/// When the upstream sent none, the body is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<Value>,
}

impl ReplyResponse {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(Value::String(reply.into())),
        }
    }
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
}

impl ErrorEnvelope {
    /// Builds the uniform "reply fetch failed" envelope around `details`.
    pub fn reply_fetch_failed(details: impl Into<String>) -> Self {
        Self {
            error: REPLY_FETCH_FAILED.to_string(),
            details: details.into(),
        }
    }
}

/// Payload sent to the upstream conversational API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamRequest<'a> {
    pub user_message: &'a str,
    pub context: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_request_uses_camel_case_and_defaults() {
        let request: ReplyRequest =
            serde_json::from_value(json!({ "message": "hi", "pageContent": "Past Events:" }))
                .unwrap();
        assert_eq!(request.message, "hi");
        assert_eq!(request.page_content, "Past Events:");

        let empty: ReplyRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, ReplyRequest::default());
    }

    #[test]
    fn upstream_request_shape() {
        let payload = UpstreamRequest {
            user_message: "hello",
            context: "page",
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "userMessage": "hello", "context": "page" })
        );
    }

    #[test]
    fn reply_response_omits_missing_reply() {
        assert_eq!(
            serde_json::to_value(ReplyResponse::default()).unwrap(),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(ReplyResponse::text("hi")).unwrap(),
            json!({ "reply": "hi" })
        );
    }

    #[test]
    fn error_envelope_is_fixed() {
        let envelope = ErrorEnvelope::reply_fetch_failed("boom");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "error": "Failed to fetch the bot reply.", "details": "boom" })
        );
    }
}
