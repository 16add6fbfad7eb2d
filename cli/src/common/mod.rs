//! # PageChat Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers that are not specific to one command. Command handlers
//! import the submodule they need directly (`crate::common::fs::io`).
//!

/// Utilities for filesystem operations (page files, config files).
pub mod fs;
