//! # PageChat Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces shared by every command. For now that is only the
//! error system; configuration lives next to the `serve` command that owns it.
//!
//! ```rust
//! use crate::core::error::{PagechatError, Result};
//! ```
//!
pub mod error;
