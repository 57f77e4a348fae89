//! Application-level utilities for the Notevault CLI.
//!
//! This module provides:
//! - Path resolution for config and database files
//! - Assembly of the note service from config and environment

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::{resolve_config_path, resolve_db_path};
