//! # PageChat Responder
//!
//! File: cli/src/bot/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The in-process "bot": given a user's message and the text of the page the
//! widget is embedded in, it picks a canned answer. It never fails. Anything
//! it can't make sense of degrades to an apology or to the help text.
//!
//! ## Architecture
//!
//! - `intent`: decides *what* the user asked (`Intent::classify`).
//! - `events`: reads event records out of the page text.
//! - `respond` (this file): glues the two together and owns the fixed phrasing.
//!
//! ## Examples
//!
//! ```rust
//! let page = "Upcoming Events:\nName: Gala\nDate: May 1\n";
//! let reply = bot::respond("what are the upcoming events?", page);
//! assert!(reply.contains("Gala"));
//! ```
//!
pub mod events;
pub mod intent;

use events::Section;
use intent::Intent;
use tracing::debug;

/// First message every widget session starts with.
pub const WELCOME: &str =
    "Welcome! You can ask me about upcoming events, past events, or a summary of the page.";

/// Fixed answer for the summary intent. Does not depend on the page.
pub const SUMMARY: &str = "This page provides details about upcoming and past events. \
     You can explore the events, view their details, and book tickets.";

/// Fixed answer for anything the classifier didn't recognize.
pub const HELP: &str = "I'm sorry, I didn't quite understand that. \
     Here are some questions I can answer:\n\n\
     • What are the upcoming events?\n\
     • What are the past events?\n\
     • Tell me a summary of the page.\n\n\
     You can ask me about these topics or try rephrasing your question!";

/// # Respond (`respond`)
///
/// Produces the bot's answer to `input` using `page_content` as the only
/// source of facts.
///
/// - "upcoming events" / "past events": the matching section's records,
///   one bullet block per record, separated by a blank line.
/// - "summary": `SUMMARY`.
/// - anything else: `HELP`.
///
/// A missing or empty section yields `"Sorry, I couldn't find any <section>."`.
pub fn respond(input: &str, page_content: &str) -> String {
    let intent = Intent::classify(input);
    debug!("Classified {:?} as {:?}", input, intent);

    match (intent, intent.section()) {
        (_, Some(section)) => describe_section(page_content, section),
        (Intent::Summary, None) => SUMMARY.to_string(),
        _ => HELP.to_string(),
    }
}

fn describe_section(page_content: &str, section: Section) -> String {
    match events::extract_records(page_content, section) {
        Some(records) if !records.is_empty() => records
            .iter()
            .map(|record| record.format())
            .collect::<Vec<_>>()
            .join("\n\n"),
        _ => not_found(section),
    }
}

fn not_found(section: Section) -> String {
    format!(
        "Sorry, I couldn't find any {}.",
        section.label().to_lowercase()
    )
}
