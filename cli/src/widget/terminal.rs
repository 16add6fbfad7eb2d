//! # Terminal Rendering for the Chat Widget
//!
//! File: cli/src/widget/terminal.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Puts a `ChatWidget` on a terminal. The widget's two controls map onto a
//! line-based loop:
//!
//! - the floating toggle button becomes `/toggle` (also `/open`, `/close`);
//! - typing a line and pressing Enter is the input box plus Enter-to-send.
//!
//! `/quit` or `bye` ends the session. The transcript is dropped with it.
//!
//! The loop is generic over its reader and writer so tests can drive it with
//! in-memory buffers.
//!
use super::remote::RemoteClient;
use super::{ChatMessage, ChatWidget, Key, Role};
use crate::core::error::Result;
use anyhow::Context;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Label of the floating button shown while the panel is closed.
pub const TOGGLE_LABEL: &str = "[ Chat Here ]";

const PROMPT: &str = "Ask me anything... > ";

/// One line of terminal input, interpreted.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Toggle,
    Open,
    Close,
    Quit,
    Message(&'a str),
}

fn parse_line(line: &str) -> Command<'_> {
    match line.trim() {
        "/toggle" => Command::Toggle,
        "/open" => Command::Open,
        "/close" => Command::Close,
        "/quit" => Command::Quit,
        other if other.eq_ignore_ascii_case("bye") => Command::Quit,
        _ => Command::Message(line),
    }
}

/// Renders one message as `Bot: ...` / `You: ...`, indenting continuation lines.
pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::Bot => "Bot",
        Role::User => "You",
    };
    message
        .content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{}: {}", speaker, line)
            } else {
                format!("     {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the whole widget: the toggle button when closed, the panel with
/// the full transcript when open.
pub fn render(widget: &ChatWidget) -> String {
    if !widget.is_open() {
        return TOGGLE_LABEL.to_string();
    }

    let mut out = String::from("+------------------ Chat ------------------ [x] +\n");
    for message in widget.messages() {
        out.push_str(&render_message(message));
        out.push('\n');
    }
    out.push_str("+-----------------------------------------------+");
    out
}

/// # Run Session (`run_session`)
///
/// Drives `widget` from `input` until end of input or a quit command,
/// writing everything the user would see to `output`.
///
/// With `remote` set, messages go through the reply proxy instead of the
/// local responder.
///
/// ## Errors
///
/// Only I/O failures on `input` / `output` are errors. Failed proxy calls
/// show up as a bot apology in the transcript.
pub async fn run_session<R, W>(
    widget: &mut ChatWidget,
    mut input: R,
    output: &mut W,
    remote: Option<&RemoteClient>,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", render(widget))?;

    loop {
        if widget.is_open() {
            write!(output, "{}", PROMPT)?;
        }
        output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            debug!("End of input, closing chat session");
            break;
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        match parse_line(line) {
            Command::Quit => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            Command::Toggle => {
                widget.toggle();
                writeln!(output, "{}", render(widget))?;
            }
            Command::Open => {
                if !widget.is_open() {
                    widget.toggle();
                }
                writeln!(output, "{}", render(widget))?;
            }
            Command::Close => {
                if widget.is_open() {
                    widget.toggle();
                }
                writeln!(output, "{}", render(widget))?;
            }
            Command::Message(text) => {
                if !widget.is_open() {
                    writeln!(
                        output,
                        "The chat is closed. Type /open to start chatting."
                    )?;
                    continue;
                }
                let before = widget.messages().len();
                send(widget, text, remote).await;
                for message in &widget.messages()[before..] {
                    writeln!(output, "{}", render_message(message))?;
                }
            }
        }
    }

    info!(
        "Chat session ended after {} messages",
        widget.messages().len()
    );
    Ok(())
}

async fn send(widget: &mut ChatWidget, text: &str, remote: Option<&RemoteClient>) {
    widget.set_input(text);
    match remote {
        None => {
            widget.handle_key(Key::Enter);
        }
        Some(client) => {
            widget.send_remote(client).await;
        }
    }
}
