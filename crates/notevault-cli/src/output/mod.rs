//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying notes
//! as JSON or plain text.

mod json;
mod text;

// Re-export public API
pub use json::{note_json, notes_json};
pub use text::{print_note, print_note_list};
