//! # Reply Proxy Client
//!
//! File: cli/src/widget/remote.rs
//! Author: Christi Mahu
//!
//! Used by widget sessions started with `--remote <url>`: posts
//! `{ message, pageContent }` to a running reply proxy and reads back either
//! `{ reply }` or the `{ error, details }` envelope. A non-string reply is
//! shown as its JSON text; a response with no reply at all counts as a failure.

use crate::core::error::{PagechatError, Result};
use crate::proxy::{ErrorEnvelope, ReplyRequest, ReplyResponse, CHAT_ROUTE};
use anyhow::Context;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    url: String,
}

impl RemoteClient {
    /// `base_url` is the proxy's origin, e.g. `http://127.0.0.1:8787`. A URL
    /// that already ends in `/api/chat` is used as is.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim_end_matches('/');
        let url = if trimmed.ends_with(CHAT_ROUTE) {
            trimmed.to_string()
        } else {
            format!("{}{}", trimmed, CHAT_ROUTE)
        };
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Asks the proxy for a reply to `message` given `page_content`.
    pub async fn ask(&self, message: &str, page_content: &str) -> Result<String> {
        let request = ReplyRequest {
            message: message.to_string(),
            page_content: page_content.to_string(),
        };

        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(PagechatError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(PagechatError::from)?;

        if status.is_success() {
            let parsed: ReplyResponse = serde_json::from_str(&body)
                .map_err(|e| PagechatError::UpstreamBody(e.to_string()))?;
            return match parsed.reply {
                Some(Value::String(reply)) => Ok(reply),
                Some(other) => Ok(other.to_string()),
                None => Err(PagechatError::UpstreamBody(
                    "the reply proxy answered without a reply".to_string(),
                )
                .into()),
            };
        }

        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Err(PagechatError::ProxyFailure {
                error: envelope.error,
                details: envelope.details,
            }
            .into()),
            Err(_) => Err(PagechatError::UpstreamStatus {
                status: status.as_u16(),
                body,
            }
            .into()),
        }
    }
}
