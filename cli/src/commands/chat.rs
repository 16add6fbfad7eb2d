//! # PageChat Chat Command
//!
//! File: cli/src/commands/chat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `pagechat chat` puts the chat widget on the terminal. By default answers
//! come from the local responder. With `--remote <url>` they come from a
//! running reply proxy instead (`pagechat serve`).
//!
//! ```bash
//! pagechat chat --page events.txt
//! pagechat chat --page events.txt --remote http://127.0.0.1:8787
//! ```
//!
//! Inside the session: type a question and press Enter, `/toggle` to
//! open or close the panel, `/quit` (or `bye`) to leave.
//!
use super::PageSource;
use crate::core::error::Result;
use crate::widget::{remote::RemoteClient, terminal, ChatWidget};
use clap::Parser;
use std::io;
use tracing::{debug, info};

/// # Chat Command Arguments (`ChatArgs`)
#[derive(Parser, Debug)]
#[command(about = "Open the chat widget in the terminal")]
pub struct ChatArgs {
    #[command(flatten)]
    pub page: PageSource,

    /// Send messages to a reply proxy at this URL instead of answering locally.
    #[arg(long)]
    pub remote: Option<String>,

    /// Start with the chat panel closed (only the toggle button is shown).
    #[arg(long)]
    pub closed: bool,
}

/// # Handle Chat Command (`handle_chat`)
///
/// Builds a widget for the page and runs the terminal session on stdin/stdout.
pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    let page_content = args.page.load()?;
    let remote = args.remote.as_deref().map(RemoteClient::new).transpose()?;

    match &remote {
        Some(client) => info!("Chat replies come from the reply proxy at {}", client.url()),
        None => info!("Chat replies come from the local responder"),
    }

    let mut widget = ChatWidget::new(page_content);
    debug!("Page content is {} bytes", widget.page_content().len());
    if !args.closed {
        widget.toggle();
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    terminal::run_session(&mut widget, stdin.lock(), &mut stdout, remote.as_ref()).await
}
