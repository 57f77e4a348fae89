//! Persistence contract consumed by the note service.
//!
//! Storage is split in two traits. `NoteStore` is the long-lived handle the
//! service keeps; `UnitOfWork` is the per-operation scope it hands out.
//! Writes staged through a unit of work become visible only after
//! `commit`; dropping it uncommitted discards them.

use async_trait::async_trait;

use crate::error::Result;
use crate::note::{NewNote, Note, NoteId};

/// Factory for per-operation units of work.
///
/// All implementations must ensure:
/// - Only ciphertext is ever written (the store never sees plaintext)
/// - Each unit of work is isolated from other in-flight units
/// - Ids are assigned by the store and never reused
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// The unit of work type handed out by this store.
    type Work: UnitOfWork;

    /// Open a fresh unit of work.
    async fn begin(&self) -> Result<Self::Work>;
}

/// Staged reads and writes with one explicit commit boundary.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Get a note by id.
    ///
    /// Returns `Ok(Some(note))` if found, `Ok(None)` if not found.
    async fn get_by_id(&mut self, id: NoteId) -> Result<Option<Note>>;

    /// List an owner's notes.
    ///
    /// Notes are returned newest-created first; ties broken by id, descending.
    async fn get_by_owner(&mut self, owner_id: &str) -> Result<Vec<Note>>;

    /// Stage a new note and assign its id.
    async fn add(&mut self, note: NewNote) -> Result<Note>;

    /// Stage a replacement of an existing note.
    async fn update(&mut self, note: Note) -> Result<Note>;

    /// Stage removal of a note.
    ///
    /// Returns whether a note with this id existed.
    async fn delete(&mut self, id: NoteId) -> Result<bool>;

    /// Whether a note with this id exists.
    async fn exists(&mut self, id: NoteId) -> Result<bool>;

    /// Flush every staged change atomically.
    async fn commit(&mut self) -> Result<()>;
}
