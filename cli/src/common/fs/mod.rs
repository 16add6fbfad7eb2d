//! # PageChat Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Filesystem helpers shared by the commands. Only plain file I/O is needed:
//! loading page text for the bot and reading configuration files.
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! let page = io::read_page_content(Path::new("events.txt"))?;
//! ```
//!

/// Contains basic file I/O operations (`read_file_to_string`, `read_page_content`).
pub mod io;
