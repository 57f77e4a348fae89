//! Note orchestration.
//!
//! `NoteService` is the only place where plaintext and storage meet. Each
//! operation opens one unit of work, stages its changes and commits once.
//! Persistence awaits race the caller's cancellation token up to the
//! commit. A commit that has started is always awaited, so `Cancelled`
//! means nothing was written.
//!
//! Failures outside the expected domain set are logged in full here and
//! handed to the caller as an opaque `VaultError::Internal`.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::crypto::CipherEngine;
use crate::error::{Result, VaultError};
use crate::note::{validate_content, DecryptedNote, NewNote, Note, NoteId};
use crate::storage::{NoteStore, UnitOfWork};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "An error occurred while creating the note",
            Operation::Get => "An error occurred while retrieving the note",
            Operation::List => "An error occurred while retrieving notes",
            Operation::Update => "An error occurred while updating the note",
            Operation::Delete => "An error occurred while deleting the note",
        }
    }

    /// Only a direct read may report corrupted ciphertext to the caller.
    fn surfaces_integrity(self) -> bool {
        self == Operation::Get
    }

    /// Keep expected failures, collapse everything else into `Internal`.
    fn finish<T>(self, result: Result<T>) -> Result<T> {
        result.map_err(|err| {
            if err.is_expected() || (self.surfaces_integrity() && err.is_integrity()) {
                debug!(operation = self.name(), error = %err, "note operation rejected");
                err
            } else {
                error!(operation = self.name(), error = %err, "note operation failed");
                VaultError::Internal(self.failure_message().to_string())
            }
        })
    }
}

/// Await `fut` unless `cancel` fires first.
async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(VaultError::Cancelled),
        result = fut => result,
    }
}

/// Commit `work` unless `cancel` has already fired.
async fn commit_unless_cancelled<W: UnitOfWork>(
    cancel: &CancellationToken,
    work: &mut W,
) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(VaultError::Cancelled);
    }
    work.commit().await
}

/// Result of decoding one stored note during a listing.
#[derive(Debug)]
pub enum DecodeOutcome {
    Decoded(DecryptedNote),
    Skipped { id: NoteId, error: VaultError },
}

/// A listing together with the notes that could not be decoded.
#[derive(Debug, Default)]
pub struct ListReport {
    /// Decoded notes, newest first
    pub notes: Vec<DecryptedNote>,

    /// Ids of stored notes that were left out
    pub skipped: Vec<NoteId>,
}

/// Encrypted note operations over a [`NoteStore`].
pub struct NoteService<S> {
    store: S,
    cipher: Arc<CipherEngine>,
}

impl<S: NoteStore> NoteService<S> {
    pub fn new(store: S, cipher: Arc<CipherEngine>) -> Self {
        Self { store, cipher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn decode(&self, note: &Note) -> Result<DecryptedNote> {
        let content = self.cipher.decrypt(note.ciphertext())?;
        Ok(DecryptedNote::from_note(note, content))
    }

    /// Encrypt and store a new note.
    ///
    /// # Errors
    ///
    /// - `Validation` if `content` is not 1–5000 characters, the envelope
    ///   exceeds 4000 characters, or `owner_id` is empty
    /// - `Cancelled` if `cancel` fires before the commit starts
    /// - `Internal` for any other failure
    pub async fn create(
        &self,
        content: &str,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> Result<DecryptedNote> {
        Operation::Create.finish(self.create_inner(content, owner_id, cancel).await)
    }

    async fn create_inner(
        &self,
        content: &str,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> Result<DecryptedNote> {
        validate_content(content)?;
        info!(owner_id, "creating note");

        let ciphertext = self.cipher.encrypt(content)?;
        let new_note = NewNote::new(ciphertext, owner_id)?;

        let mut work = cancellable(cancel, self.store.begin()).await?;
        let note = cancellable(cancel, work.add(new_note)).await?;
        commit_unless_cancelled(cancel, &mut work).await?;

        info!(note_id = note.id(), "note created");
        self.decode(&note)
    }

    /// Fetch and decrypt one note.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no note has this id
    /// - `MalformedEnvelope` or `DecryptionFailure` if the stored ciphertext
    ///   is corrupt
    /// - `Cancelled` or `Internal` as for every operation
    pub async fn get(&self, id: NoteId, cancel: &CancellationToken) -> Result<DecryptedNote> {
        Operation::Get.finish(self.get_inner(id, cancel).await)
    }

    async fn get_inner(&self, id: NoteId, cancel: &CancellationToken) -> Result<DecryptedNote> {
        let mut work = cancellable(cancel, self.store.begin()).await?;
        let note = cancellable(cancel, work.get_by_id(id))
            .await?
            .ok_or_else(|| VaultError::note_not_found(id))?;

        self.decode(&note)
    }

    /// List an owner's notes, newest first.
    ///
    /// Notes whose ciphertext cannot be decrypted are left out; see
    /// [`NoteService::list_report`] to learn which.
    pub async fn list(
        &self,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<DecryptedNote>> {
        Ok(self.list_report(owner_id, cancel).await?.notes)
    }

    /// List an owner's notes and report which ones were skipped.
    pub async fn list_report(
        &self,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ListReport> {
        let outcomes = Operation::List.finish(self.list_inner(owner_id, cancel).await)?;

        let mut report = ListReport::default();
        for outcome in outcomes {
            match outcome {
                DecodeOutcome::Decoded(note) => report.notes.push(note),
                DecodeOutcome::Skipped { id, error } => {
                    warn!(note_id = id, error = %error, "skipping undecryptable note");
                    report.skipped.push(id);
                }
            }
        }
        Ok(report)
    }

    async fn list_inner(
        &self,
        owner_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<DecodeOutcome>> {
        let mut work = cancellable(cancel, self.store.begin()).await?;
        let notes = cancellable(cancel, work.get_by_owner(owner_id)).await?;

        Ok(notes
            .iter()
            .map(|note| match self.decode(note) {
                Ok(decoded) => DecodeOutcome::Decoded(decoded),
                Err(error) => DecodeOutcome::Skipped {
                    id: note.id(),
                    error,
                },
            })
            .collect())
    }

    /// Replace a note's content.
    ///
    /// The new content is encrypted under a fresh IV and `updated_at` is
    /// stamped.
    pub async fn update(
        &self,
        id: NoteId,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<DecryptedNote> {
        Operation::Update.finish(self.update_inner(id, content, cancel).await)
    }

    async fn update_inner(
        &self,
        id: NoteId,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<DecryptedNote> {
        let mut work = cancellable(cancel, self.store.begin()).await?;
        let mut note = cancellable(cancel, work.get_by_id(id))
            .await?
            .ok_or_else(|| VaultError::note_not_found(id))?;

        validate_content(content)?;
        let ciphertext = self.cipher.encrypt(content)?;
        note.replace_ciphertext(ciphertext)?;

        let note = cancellable(cancel, work.update(note)).await?;
        commit_unless_cancelled(cancel, &mut work).await?;

        info!(note_id = id, "note updated");
        Ok(DecryptedNote::from_note(&note, content.to_string()))
    }

    /// Delete a note.
    ///
    /// Returns whether a record was removed.
    pub async fn delete(&self, id: NoteId, cancel: &CancellationToken) -> Result<bool> {
        Operation::Delete.finish(self.delete_inner(id, cancel).await)
    }

    async fn delete_inner(&self, id: NoteId, cancel: &CancellationToken) -> Result<bool> {
        let mut work = cancellable(cancel, self.store.begin()).await?;
        if !cancellable(cancel, work.exists(id)).await? {
            return Err(VaultError::note_not_found(id));
        }

        let deleted = cancellable(cancel, work.delete(id)).await?;
        commit_unless_cancelled(cancel, &mut work).await?;

        info!(note_id = id, "note deleted");
        Ok(deleted)
    }
}
