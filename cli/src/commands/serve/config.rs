//! # PageChat Reply Proxy Configuration
//!
//! File: cli/src/commands/serve/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module handles configuration loading, merging, and validation for
//! the reply proxy server. It combines settings from:
//! 1. Command-line arguments (highest priority)
//! 2. A `.pagechat.toml` file in the current directory, or the file named by `--config`
//! 3. Default values (lowest priority)
//!
//! ## Architecture
//!
//! The configuration system follows these steps:
//! 1. Parse command-line arguments
//! 2. Load configuration from file (if present)
//! 3. Merge settings (explicit CLI args override file settings)
//! 4. Validate the upstream URL and resolve the optional static directory
//! 5. Create a unified `ServerConfig`
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! port = 8787
//! host = "0.0.0.0"
//! upstream_url = "https://api.gemini.com/v1/chat"
//! api_key_env = "GEMINI_API_KEY"
//! enable_cors = true
//! timeout_secs = 30
//! static_dir = "public"
//! ```
//!
//! The API key itself never lives in the config; only the *name* of the
//! environment variable holding it does. The variable is read on every request.
//!
use crate::common::fs::io;
use crate::core::error::{PagechatError, Result};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::net::IpAddr;
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".pagechat.toml";

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.gemini.com/v1/chat";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// # Serve Command Arguments (`ServeArgs`)
///
/// Command-line arguments for `pagechat serve`. Anything left at its default
/// can be overridden by the configuration file.
#[derive(Parser, Debug)]
#[command(about = "Run the reply proxy (POST /api/chat)")]
pub struct ServeArgs {
    /// Path to a TOML configuration file. Defaults to `./.pagechat.toml` if present.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(long, short, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind. Use `0.0.0.0` to listen on all interfaces.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Conversational API endpoint that messages are forwarded to.
    #[arg(long, default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Name of the environment variable holding the upstream bearer token.
    #[arg(long, default_value = DEFAULT_API_KEY_ENV)]
    pub api_key_env: String,

    /// Disables CORS headers. CORS is permissive by default so a page on
    /// another origin can embed the widget.
    #[arg(long)]
    pub no_cors: bool,

    /// Upstream request timeout in seconds. No timeout unless set.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory of static files (e.g. the host page) to serve at `/`.
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// The merged, validated settings the server runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub upstream_url: String,
    pub api_key_env: String,
    pub enable_cors: bool,
    pub timeout_secs: Option<u64>,
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            enable_cors: true,
            timeout_secs: None,
            static_dir: None,
        }
    }
}

/// Raw shape of `.pagechat.toml`. Every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    host: Option<String>, // Parsed separately so a bad value only warns.
    upstream_url: Option<String>,
    api_key_env: Option<String>,
    enable_cors: Option<bool>,
    timeout_secs: Option<u64>,
    static_dir: Option<String>,
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Produces the final `ServerConfig`.
///
/// ## Process:
/// 1. Start from the command-line arguments.
/// 2. Locate a config file: `--config` if given (it must exist), otherwise
///    `.pagechat.toml` in the current directory (optional).
/// 3. For every setting still at its CLI default, take the file's value.
///    `--no-cors` always wins over the file.
/// 4. Validate the upstream URL and resolve `static_dir` to an existing directory.
///
/// ## Errors
///
/// Returns an error if:
/// - `--config` points at a missing file.
/// - The config file cannot be read or parsed (including unknown keys).
/// - The upstream URL is not a valid absolute URL.
/// - `static_dir` does not exist or is not a directory.
pub async fn load_and_merge_config(args: ServeArgs) -> Result<ServerConfig> {
    let config_path = match &args.config {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!(PagechatError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path.clone())
        }
        None => {
            let candidate = env::current_dir()
                .context("Failed to get current working directory")?
                .join(CONFIG_FILE_NAME);
            candidate.is_file().then_some(candidate)
        }
    };

    let file_config = match config_path {
        Some(path) => Some(load_config_file(&path)?),
        None => {
            debug!("No config file found. Using arguments.");
            None
        }
    };

    let mut config = merge(&args, file_config);
    config.validate().await?;
    Ok(config)
}

/// Reads and parses one config file. A relative `static_dir` is resolved
/// against the directory the file lives in.
fn load_config_file(path: &Path) -> Result<ServerConfig> {
    info!("Loading configuration from {}", path.display());

    let content = io::read_file_to_string(path)?;
    let file_config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    let defaults = ServerConfig::default();

    let host = match file_config.host {
        Some(ref host_str) => host_str.parse().unwrap_or_else(|e| {
            warn!(
                "Invalid host IP '{}' in config file ({}), using default {}",
                host_str, e, defaults.host
            );
            defaults.host
        }),
        None => defaults.host,
    };

    let static_dir = file_config.static_dir.map(|dir| {
        let dir = PathBuf::from(dir);
        match (dir.is_relative(), path.parent()) {
            (true, Some(parent)) => parent.join(dir),
            _ => dir,
        }
    });

    Ok(ServerConfig {
        port: file_config.port.unwrap_or(defaults.port),
        host,
        upstream_url: file_config.upstream_url.unwrap_or(defaults.upstream_url),
        api_key_env: file_config.api_key_env.unwrap_or(defaults.api_key_env),
        enable_cors: file_config.enable_cors.unwrap_or(defaults.enable_cors),
        timeout_secs: file_config.timeout_secs,
        static_dir,
    })
}

/// Applies the precedence rules: explicit CLI values beat the file, the file
/// beats defaults.
fn merge(args: &ServeArgs, file_config: Option<ServerConfig>) -> ServerConfig {
    let mut effective = ServerConfig::from_args(args);
    let Some(file) = file_config else {
        return effective;
    };
    let cli_defaults = ServeArgs::parse_from(["pagechat-serve"]);

    if args.port == cli_defaults.port {
        effective.port = file.port;
    }
    if args.host == cli_defaults.host {
        effective.host = file.host;
    }
    if args.upstream_url == cli_defaults.upstream_url {
        effective.upstream_url = file.upstream_url;
    }
    if args.api_key_env == cli_defaults.api_key_env {
        effective.api_key_env = file.api_key_env;
    }
    if !args.no_cors {
        effective.enable_cors = file.enable_cors;
    }
    if args.timeout_secs.is_none() {
        effective.timeout_secs = file.timeout_secs;
    }
    if args.static_dir.is_none() {
        effective.static_dir = file.static_dir;
    }
    effective
}

impl ServerConfig {
    fn from_args(args: &ServeArgs) -> Self {
        Self {
            port: args.port,
            host: args.host,
            upstream_url: args.upstream_url.clone(),
            api_key_env: args.api_key_env.clone(),
            enable_cors: !args.no_cors,
            timeout_secs: args.timeout_secs,
            static_dir: args.static_dir.clone(),
        }
    }

    /// Upstream timeout as a `Duration`, if one was configured.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs.map(std::time::Duration::from_secs)
    }

    /// Checks the upstream URL and canonicalizes `static_dir`.
    async fn validate(&mut self) -> Result<()> {
        reqwest::Url::parse(&self.upstream_url).map_err(|e| {
            PagechatError::Config(format!(
                "Invalid upstream URL '{}': {}",
                self.upstream_url, e
            ))
        })?;

        if self.api_key_env.trim().is_empty() {
            anyhow::bail!(PagechatError::Config(
                "api_key_env must name an environment variable".to_string()
            ));
        }

        if let Some(dir) = &self.static_dir {
            let canonical = tokio::fs::canonicalize(dir).await.with_context(|| {
                format!("Static directory '{}' could not be found", dir.display())
            })?;
            let metadata = tokio::fs::metadata(&canonical).await?;
            if !metadata.is_dir() {
                anyhow::bail!(PagechatError::Config(format!(
                    "Static path is not a directory: {}",
                    canonical.display()
                )));
            }
            debug!("Resolved static directory to: {}", canonical.display());
            self.static_dir = Some(canonical);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn default_args() -> ServeArgs {
        ServeArgs::parse_from(["pagechat-serve"])
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8787);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.upstream_url, "https://api.gemini.com/v1/chat");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert!(config.enable_cors);
        assert!(config.timeout().is_none());
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_from_args() {
        let args = ServeArgs::parse_from([
            "pagechat-serve",
            "--port",
            "9000",
            "--host",
            "0.0.0.0",
            "--no-cors",
            "--timeout-secs",
            "5",
            "--api-key-env",
            "MY_KEY",
        ]);
        let config = ServerConfig::from_args(&args);

        assert_eq!(config.port, 9000);
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert!(!config.enable_cors);
        assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(5)));
        assert_eq!(config.api_key_env, "MY_KEY");
    }

    #[test]
    fn test_load_config_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
            port = 9090
            host = "0.0.0.0"
            upstream_url = "http://localhost:1234/chat"
            enable_cors = false
            timeout_secs = 10
            static_dir = "public"
            "#,
        )?;

        let config = load_config_file(&path)?;
        assert_eq!(config.port, 9090);
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert_eq!(config.upstream_url, "http://localhost:1234/chat");
        assert_eq!(config.api_key_env, DEFAULT_API_KEY_ENV);
        assert!(!config.enable_cors);
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(config.static_dir, Some(temp_dir.path().join("public")));
        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "prot = 1\n")?;

        assert!(load_config_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_host_falls_back_to_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "host = \"not-an-ip\"\n")?;

        let config = load_config_file(&path)?;
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_fills_in_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir(temp_dir.path().join("www"))?;
        let path = temp_dir.path().join("chat.toml");
        fs::write(
            &path,
            r#"
            port = 9091
            upstream_url = "http://127.0.0.1:9/upstream"
            api_key_env = "OTHER_KEY"
            enable_cors = false
            static_dir = "www"
            "#,
        )?;

        let args = ServeArgs {
            config: Some(path),
            ..default_args()
        };
        let config = load_and_merge_config(args).await?;

        assert_eq!(config.port, 9091);
        assert_eq!(config.upstream_url, "http://127.0.0.1:9/upstream");
        assert_eq!(config.api_key_env, "OTHER_KEY");
        assert!(!config.enable_cors);
        assert_eq!(
            config.static_dir,
            Some(fs::canonicalize(temp_dir.path().join("www"))?)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_cli_overrides_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("chat.toml");
        fs::write(
            &path,
            r#"
            port = 9091
            host = "0.0.0.0"
            upstream_url = "http://127.0.0.1:9/from-file"
            enable_cors = true
            timeout_secs = 10
            "#,
        )?;

        let args = ServeArgs {
            config: Some(path),
            port: 7000,
            host: "10.0.0.1".parse()?,
            upstream_url: "http://127.0.0.1:9/from-cli".into(),
            no_cors: true,
            timeout_secs: Some(3),
            ..default_args()
        };
        let config = load_and_merge_config(args).await?;

        assert_eq!(config.port, 7000);
        assert_eq!(config.host.to_string(), "10.0.0.1");
        assert_eq!(config.upstream_url, "http://127.0.0.1:9/from-cli");
        assert!(!config.enable_cors);
        assert_eq!(config.timeout_secs, Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_explicit_config_is_an_error() {
        let args = ServeArgs {
            config: Some(PathBuf::from("/path/that/definitely/does/not/exist.toml")),
            ..default_args()
        };
        assert!(load_and_merge_config(args).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_upstream_url_is_rejected() {
        let mut config = ServerConfig {
            upstream_url: "not a url".into(),
            ..ServerConfig::default()
        };
        let err = config.validate().await.unwrap_err();
        assert!(err.to_string().contains("Invalid upstream URL"));
    }

    #[tokio::test]
    async fn test_static_dir_must_exist() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("index.html");
        fs::write(&file, "<html></html>")?;

        let mut missing = ServerConfig {
            static_dir: Some(PathBuf::from("/path/that/definitely/does/not/exist")),
            ..ServerConfig::default()
        };
        assert!(missing.validate().await.is_err());

        let mut not_a_dir = ServerConfig {
            static_dir: Some(file),
            ..ServerConfig::default()
        };
        assert!(not_a_dir.validate().await.is_err());
        Ok(())
    }
}
