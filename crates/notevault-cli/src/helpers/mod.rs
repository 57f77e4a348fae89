//! Input helper functions for the CLI.

mod input;

// Re-export public API
pub use input::read_note_body;
