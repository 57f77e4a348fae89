//! Storage backends for encrypted notes.
//!
//! Backends only ever see ciphertext. Two implementations are provided:
//! an in-memory store for tests and embedding, and a SQLite store for the
//! CLI.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::{MemoryNoteStore, MemoryUnitOfWork};
pub use sqlite::{SqliteNoteStore, SqliteUnitOfWork};
pub use traits::{NoteStore, UnitOfWork};
