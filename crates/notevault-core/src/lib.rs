//! # Notevault Core
//!
//! Core library for Notevault - encrypted-at-rest storage for short text
//! notes owned by users.
//!
//! Note content is encrypted with a key derived from a configured master
//! secret before it ever reaches storage, and decrypted only on the way
//! back out to the caller.
//!
//! ## Architecture
//!
//! - **crypto**: Key derivation and envelope encryption
//! - **note**: Note entity and its invariants
//! - **storage**: Persistence contract plus memory and SQLite backends
//! - **service**: Create/get/list/update/delete orchestration
//! - **fs**: Atomic file replacement

pub mod crypto;
pub mod error;
pub mod fs;
pub mod note;
pub mod service;
pub mod storage;

pub use crypto::{CipherEngine, EncryptionSettings};
pub use error::{Result, VaultError};
pub use note::{DecryptedNote, NewNote, Note, NoteId};
pub use service::{DecodeOutcome, ListReport, NoteService};
pub use storage::{MemoryNoteStore, NoteStore, SqliteNoteStore, UnitOfWork};

/// Re-exported so callers can build tokens without a direct dependency.
pub use tokio_util::sync::CancellationToken;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
