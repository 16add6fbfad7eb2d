//! # PageChat CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each other file
//! in this directory is its own test crate and pulls this in with `mod common;`.
//!

// Not every test file uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// A page with one upcoming and one past event.
pub const EVENTS_PAGE: &str = "Upcoming Events:\n\
Name: Gala\nDate: May 1\nLocation: Hall\nPrice: $10\n\n\
Past Events:\n\
Name: Fair\nDate: Jan 3\nLocation: Park\nPrice: Free\n";

/// # Get PageChat Command (`pagechat_cmd`)
///
/// An `assert_cmd::Command` for the `pagechat` binary built for this test run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn pagechat_cmd() -> Command {
    let mut cmd = Command::cargo_bin("pagechat").expect("Failed to find pagechat binary for testing");
    cmd.env_remove("RUST_LOG");
    cmd
}
