//! # Intent Classification
//!
//! File: cli/src/bot/intent.rs
//! Author: Christi Mahu
//!
//! Maps free-text user input onto one of the questions the bot knows how to
//! answer. Matching is a case-insensitive substring test against a fixed
//! list of phrases, checked in order; the first hit wins.

use super::events::Section;

/// A recognized user question, or the catch-all when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// "What are the upcoming events?" and friends.
    UpcomingEvents,
    /// "What are the past events?" and friends.
    PastEvents,
    /// Anything mentioning "summary".
    Summary,
    /// No phrase matched; the bot answers with its help text.
    Unknown,
}

/// Ordered phrase table. Order matters: an input mentioning both
/// "upcoming events" and "past events" resolves to `UpcomingEvents`.
const PHRASES: [(&str, Intent); 3] = [
    ("upcoming events", Intent::UpcomingEvents),
    ("past events", Intent::PastEvents),
    ("summary", Intent::Summary),
];

impl Intent {
    /// Classifies `input` by case-insensitive substring match.
    pub fn classify(input: &str) -> Self {
        let lowered = input.to_lowercase();
        PHRASES
            .iter()
            .find(|(phrase, _)| lowered.contains(phrase))
            .map(|(_, intent)| *intent)
            .unwrap_or(Intent::Unknown)
    }

    /// The page section this intent reads from, if any.
    pub fn section(self) -> Option<Section> {
        match self {
            Intent::UpcomingEvents => Some(Section::Upcoming),
            Intent::PastEvents => Some(Section::Past),
            Intent::Summary | Intent::Unknown => None,
        }
    }
}
