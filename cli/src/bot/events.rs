//! # Event Section Extraction
//!
//! File: cli/src/bot/events.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Pulls event records out of a page's plain text. A page is expected to look
//! roughly like this:
//!
//! ```text
//! Upcoming Events:
//! Name: Gala
//! Date: May 1
//! Location: Hall
//! Price: $10
//!
//! Name: Picnic
//! Date: June 3
//!
//! Past Events:
//! Name: Winter Fair
//! ```
//!
//! Nothing is enforced. A section runs from its `"<Label>:"` marker to the
//! next known marker (or the end of the text), records are separated by a
//! blank line, and each record may carry any subset of the four fields.
//! Missing fields are left out of the rendered output entirely; a record
//! carrying none of them is dropped.

/// A labeled block of event records within the page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Upcoming,
    Past,
}

impl Section {
    /// Every section the extractor knows about. Used to find where a section ends.
    pub const ALL: [Section; 2] = [Section::Upcoming, Section::Past];

    /// Human-readable label, as it appears in the page.
    pub fn label(self) -> &'static str {
        match self {
            Section::Upcoming => "Upcoming Events",
            Section::Past => "Past Events",
        }
    }

    /// The literal marker that opens this section in the page text.
    pub fn marker(self) -> &'static str {
        match self {
            Section::Upcoming => "Upcoming Events:",
            Section::Past => "Past Events:",
        }
    }
}

/// The four fields the bot knows how to read from a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRecord {
    pub name: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub price: Option<String>,
}

impl EventRecord {
    /// Parses one blank-line delimited record.
    ///
    /// For each field the first line starting with the exact, case-sensitive
    /// prefix wins; the prefix and surrounding whitespace are stripped.
    pub fn parse(record: &str) -> Self {
        let field = |prefix: &str| {
            record
                .lines()
                .find_map(|line| line.strip_prefix(prefix))
                .map(|value| value.trim().to_string())
        };

        Self {
            name: field("Name:"),
            date: field("Date:"),
            location: field("Location:"),
            price: field("Price:"),
        }
    }

    /// True when none of the four fields were present.
    pub fn is_empty(&self) -> bool {
        self.fields().into_iter().all(|(_, value)| value.is_none())
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("Name", self.name.as_deref()),
            ("Date", self.date.as_deref()),
            ("Location", self.location.as_deref()),
            ("Price", self.price.as_deref()),
        ]
    }

    /// Renders the present fields as bullet lines, in a fixed order.
    pub fn format(&self) -> String {
        self.fields()
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| format!("• {}: {}", label, v)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Returns the raw text of `section`, or `None` if its marker never appears.
///
/// The body starts right after the first marker and stops at the next known
/// section marker, so one section's answer never includes another's records.
pub fn section_body(page_content: &str, section: Section) -> Option<&str> {
    let start = page_content.find(section.marker())? + section.marker().len();
    let rest = &page_content[start..];

    let end = Section::ALL
        .iter()
        .filter_map(|other| rest.find(other.marker()))
        .min()
        .unwrap_or(rest.len());

    Some(&rest[..end])
}

/// Extracts and parses every non-empty record of `section`.
///
/// Returns `None` when the section marker is missing, and an empty vector
/// when the section exists but holds no usable record.
pub fn extract_records(page_content: &str, section: Section) -> Option<Vec<EventRecord>> {
    let normalized = page_content.replace("\r\n", "\n");
    let body = section_body(&normalized, section)?;

    let records = body
        .split("\n\n")
        .filter(|chunk| !chunk.trim().is_empty())
        .map(EventRecord::parse)
        .filter(|record| !record.is_empty())
        .collect();

    Some(records)
}
