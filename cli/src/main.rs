//! # PageChat Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! PageChat is a small event-page chat assistant. This binary hosts its
//! pieces:
//! - `ask`: one answer from the page-text responder
//! - `chat`: the chat widget (toggle, input, transcript) in the terminal
//! - `serve`: the reply proxy that forwards messages to an upstream API
//!
//! ## Architecture
//!
//! - `bot`: intent classification and event extraction (infallible)
//! - `widget`: the chat session state and its terminal front end
//! - `proxy`: wire types, upstream client and the `POST /api/chat` handler
//! - `commands`: argument parsing and handlers for each subcommand
//! - `common` / `core`: shared file helpers, error types
//!
//! ## Examples
//!
//! ```bash
//! pagechat ask "upcoming events" --page events.txt
//! pagechat -v chat --page events.txt
//! RUST_LOG=debug pagechat serve --port 8787
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod bot;
mod commands;
mod common;
mod core;
mod proxy;
mod widget;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "pagechat",
    about = "💬 PageChat: an event-page chat assistant and reply proxy",
    long_about = "Answer questions about a page's upcoming and past events, chat with the\n\
                  assistant in the terminal, or run the reply proxy that forwards messages\n\
                  to an external conversational API.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
