//! # PageChat Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types shared across the PageChat binary.
//! Two error domains exist and never overlap:
//!
//! - The responder (`crate::bot`) is infallible. It always produces a
//!   human-readable answer, so it has no error type at all.
//! - Everything that touches the outside world (configuration files, page
//!   files, the upstream conversational API) reports failures through
//!   `PagechatError` wrapped in `anyhow::Error`.
//!
//! ## Architecture
//!
//! - `PagechatError`: a `thiserror` enum naming the specific failure kinds.
//! - `Result<T>`: an alias for `anyhow::Result<T>` so call sites can attach
//!   context with `.context(...)` / `.with_context(...)`.
//!
//! The reply proxy collapses every `PagechatError` it sees into a single
//! "reply fetch failed" envelope (see `crate::proxy`); the distinct variants
//! only matter for logs and for the command-line surface.
//!
//! ## Examples
//!
//! ```rust
//! if !path.is_file() {
//!     return Err(PagechatError::FileSystem(format!("Not a file: {}", path.display())))?;
//! }
//!
//! let page = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read page file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the PageChat application.
#[derive(Error, Debug)]
pub enum PagechatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Upstream request failed: {source}")]
    UpstreamTransport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Upstream response was malformed: {0}")]
    UpstreamBody(String),

    #[error("Reply proxy returned an error: {error} ({details})")]
    ProxyFailure { error: String, details: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = PagechatError::Config("Missing setting 'upstream_url'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'upstream_url'"
        );

        let status_err = PagechatError::UpstreamStatus {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(
            status_err.to_string(),
            "Upstream returned status 401: unauthorized"
        );

        let proxy_err = PagechatError::ProxyFailure {
            error: "Failed to fetch the bot reply.".into(),
            details: "connection refused".into(),
        };
        assert_eq!(
            proxy_err.to_string(),
            "Reply proxy returned an error: Failed to fetch the bot reply. (connection refused)"
        );
    }
}
