//! # PageChat Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that attach the path to any error:
//!
//! - **`read_file_to_string`**: reads a whole file, used for config files.
//! - **`read_page_content`**: reads the page text the bot answers from,
//!   rejecting directories up front with a clear message.
//!
use crate::core::error::{PagechatError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reads the entire content of a file into a string.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be found, opened, or read, with
/// context indicating which file failed.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Loads the page text the widget is embedded in.
///
/// The content is returned untouched; the bot does its own normalization.
///
/// # Errors
///
/// - `PagechatError::FileSystem` if `path` exists but is not a regular file.
/// - Any read error, with the path as context.
pub fn read_page_content(path: &Path) -> Result<String> {
    if path.exists() && !path.is_file() {
        anyhow::bail!(PagechatError::FileSystem(format!(
            "Page content path is not a file: {:?}",
            path
        )));
    }

    let content = read_file_to_string(path)?;
    info!("Loaded page content from {:?}", path);
    debug!("Page content is {} bytes", content.len());
    Ok(content)
}
