//! # Recsync Common Library
//!
//! Shared code for the recsync tools including:
//! - Error types
//! - TOML configuration model and loading
//! - Root folder resolution and directory layout bootstrap
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod layout;
pub mod time;

pub use error::{Error, Result};
pub use layout::DirectoryLayout;
