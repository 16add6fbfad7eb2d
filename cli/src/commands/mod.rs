//! # PageChat Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The top-level commands of the `pagechat` binary:
//!
//! - `ask`: answer one message from the page and exit
//! - `chat`: the chat widget in the terminal
//! - `serve`: the reply proxy HTTP server
//!
//! Each command defines its own arguments struct and handler function.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

/// Answers a single message and exits.
pub mod ask;
/// Interactive chat widget session.
pub mod chat;
/// Reply proxy server. Includes configuration and server logic.
pub mod serve;

/// Where the page content comes from. Shared by `ask` and `chat`.
#[derive(Args, Debug, Clone, Default)]
pub struct PageSource {
    /// File holding the page's text content.
    #[arg(long, conflicts_with = "page_text")]
    pub page: Option<PathBuf>,

    /// Page text given inline instead of from a file.
    #[arg(long)]
    pub page_text: Option<String>,
}

impl PageSource {
    /// Returns the page content, or an empty page if none was given.
    pub fn load(&self) -> Result<String> {
        match (&self.page, &self.page_text) {
            (Some(path), _) => io::read_page_content(path),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => {
                warn!("No page content given; event questions will find nothing");
                Ok(String::new())
            }
        }
    }
}
