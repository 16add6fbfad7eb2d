//! # PageChat Widget Session
//!
//! File: cli/src/widget/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The state behind the floating chat button: whether the panel is open, what
//! the user is typing, and the conversation so far. One `ChatWidget` owns all
//! of it; nothing is global and nothing outlives the session.
//!
//! ## Invariants
//!
//! - The transcript always starts with the welcome message.
//! - Messages are only ever appended. Nothing is reordered or edited.
//! - A local send appends exactly two messages: the user's text, then the
//!   bot's answer computed synchronously by `crate::bot::respond`.
//! - A remote send is split into `begin_remote_send` / `complete_remote_send`.
//!   The user's message is appended up front and survives a failed reply;
//!   the failure becomes an apology from the bot. While a reply is pending,
//!   further sends are refused.
//!
//! ## Submodules
//!
//! - `remote`: client for the reply proxy, used by `--remote` sessions.
//! - `terminal`: renders the widget and drives it from line-based input.
//!
use crate::bot;
use crate::core::error::Result;
use remote::RemoteClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod remote;
pub mod terminal;

/// Bot message appended when the reply proxy could not produce an answer.
pub const REMOTE_FAILURE: &str =
    "Sorry, I couldn't reach the assistant right now. Please try again.";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

/// Key presses the widget reacts to. Only Enter does anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// A single chat widget session bound to one page.
#[derive(Debug)]
pub struct ChatWidget {
    page_content: String,
    messages: Vec<ChatMessage>,
    input: String,
    is_open: bool,
    pending: bool,
}

impl ChatWidget {
    /// Creates a closed widget for `page_content` with only the welcome message.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            messages: vec![ChatMessage::bot(bot::WELCOME)],
            input: String::new(),
            is_open: false,
            pending: false,
        }
    }

    pub fn page_content(&self) -> &str {
        &self.page_content
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Flips the panel between open and closed. The transcript is kept either way.
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
        debug!("Chat panel is now {}", if self.is_open { "open" } else { "closed" });
    }

    /// Replaces the text currently typed into the input box.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Reacts to a key press in the input box. Returns `true` if a message was sent.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter => self.send(),
            Key::Other => false,
        }
    }

    /// # Send (`send`)
    ///
    /// Sends the pending input through the local responder.
    ///
    /// Blank (or whitespace-only) input is ignored and left in place. Otherwise
    /// the input is cleared, the user's message is appended as typed, and the
    /// bot's answer is appended right after it.
    ///
    /// Returns `true` if two messages were appended.
    pub fn send(&mut self) -> bool {
        let Some(text) = self.take_input() else {
            return false;
        };

        let reply = bot::respond(&text, &self.page_content);
        self.append(ChatMessage::user(text));
        self.append(ChatMessage::bot(reply));
        true
    }

    /// First half of a remote send: appends the user's message, marks the
    /// widget pending and returns the text to forward.
    ///
    /// Returns `None` for blank input or when a reply is already pending.
    pub fn begin_remote_send(&mut self) -> Option<String> {
        let text = self.take_input()?;
        self.append(ChatMessage::user(text.clone()));
        self.pending = true;
        Some(text)
    }

    /// Second half of a remote send: appends the bot's reply, or
    /// `REMOTE_FAILURE` if the proxy call failed, and clears the pending flag.
    pub fn complete_remote_send(&mut self, outcome: Result<String>) {
        if !self.pending {
            warn!("Ignoring a remote reply with no send in flight");
            return;
        }
        self.pending = false;

        let content = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Remote reply failed: {:#}", e);
                REMOTE_FAILURE.to_string()
            }
        };
        self.append(ChatMessage::bot(content));
    }

    /// # Send Remote (`send_remote`)
    ///
    /// Sends the pending input through the reply proxy behind `client`.
    /// Returns `true` if the user's message was appended; the bot's reply (or
    /// `REMOTE_FAILURE`) always follows it.
    pub async fn send_remote(&mut self, client: &RemoteClient) -> bool {
        let Some(message) = self.begin_remote_send() else {
            return false;
        };
        let outcome = client.ask(&message, &self.page_content).await;
        self.complete_remote_send(outcome);
        true
    }

    fn take_input(&mut self) -> Option<String> {
        if self.pending {
            debug!("A reply is still pending; not sending");
            return None;
        }
        if self.input.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.input))
    }

    fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}
