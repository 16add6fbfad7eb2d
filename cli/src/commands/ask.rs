//! # PageChat Ask Command
//!
//! File: cli/src/commands/ask.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `pagechat ask` answers a single message and exits. Useful for checking
//! what the bot makes of a page without opening a chat session.
//!
//! ```bash
//! pagechat ask "what are the upcoming events?" --page events.txt
//! ```
//!
use super::PageSource;
use crate::bot;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// # Ask Command Arguments (`AskArgs`)
#[derive(Parser, Debug)]
#[command(about = "Answer a single message from the page content and exit")]
pub struct AskArgs {
    /// The message to answer, e.g. "what are the past events?".
    #[arg(required = true)]
    pub message: String,

    #[command(flatten)]
    pub page: PageSource,
}

/// # Handle Ask Command (`handle_ask`)
///
/// Loads the page content, runs the responder once, prints the answer.
pub async fn handle_ask(args: AskArgs) -> Result<()> {
    info!("Handling ask command for message {:?}", args.message);

    let page_content = args.page.load()?;
    let reply = bot::respond(&args.message, &page_content);
    println!("{}", reply);

    Ok(())
}
