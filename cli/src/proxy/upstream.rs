//! # Upstream Conversational API Client
//!
//! File: cli/src/proxy/upstream.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A thin wrapper around `reqwest::Client` that performs the proxy's single
//! outbound call. The bearer credential is read from the process environment
//! on every request, so rotating the key does not require a restart. When the
//! variable is unset (or empty) the request goes out without an
//! `Authorization` header and the upstream is left to reject it.
//!
//! No retries. The client only has a timeout when one was configured.
//!
use super::UpstreamRequest;
use crate::core::error::{PagechatError, Result};
use anyhow::Context;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the external conversational API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    endpoint: String,
    api_key_env: String,
}

impl UpstreamClient {
    /// Creates a client posting to `endpoint`, authenticating with the value of
    /// the environment variable named `api_key_env`.
    ///
    /// ## Errors
    ///
    /// Fails only if the underlying HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialize).
    pub fn new(endpoint: &str, api_key_env: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key_env: api_key_env.to_string(),
        })
    }

    /// The upstream URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// # Fetch Reply (`fetch_reply`)
    ///
    /// Posts `{ userMessage, context }` upstream and returns its `reply` field.
    ///
    /// The field is taken as is: `None` when the upstream left it out (or sent
    /// `null`), any JSON value otherwise.
    ///
    /// ## Errors
    ///
    /// - `PagechatError::UpstreamTransport`: connection failure, timeout, etc.
    /// - `PagechatError::UpstreamStatus`: any non-2xx status.
    /// - `PagechatError::UpstreamBody`: the body is not JSON.
    pub async fn fetch_reply(&self, message: &str, context: &str) -> Result<Option<Value>> {
        let payload = UpstreamRequest {
            user_message: message,
            context,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        match self.api_key() {
            Some(key) => request = request.bearer_auth(key),
            None => warn!(
                "{} is not set; calling upstream without credentials",
                self.api_key_env
            ),
        }

        debug!("POST {}", self.endpoint);
        let response = request.send().await.map_err(PagechatError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PagechatError::UpstreamStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response.text().await.map_err(PagechatError::from)?;
        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| PagechatError::UpstreamBody(e.to_string()))?;

        let reply = parsed.get("reply").filter(|v| !v.is_null()).cloned();
        match &reply {
            Some(reply) => info!("Upstream reply: {}", reply),
            None => warn!("Upstream response has no reply field: {}", body),
        }
        Ok(reply)
    }
}
