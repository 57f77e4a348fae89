//! Note entity and its invariants.
//!
//! A `Note` only ever carries ciphertext. Plaintext exists solely in the
//! caller-facing `DecryptedNote` projection produced by the service.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use crate::error::{Result, VaultError};

/// Storage-assigned note identifier.
pub type NoteId = i64;

/// Maximum length of a stored envelope, in characters.
pub const MAX_CIPHERTEXT_CHARS: usize = 4000;

/// Maximum length of caller-supplied content, in characters.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Current time at the microsecond precision storage keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn validate_ciphertext(ciphertext: &str) -> Result<()> {
    if ciphertext.trim().is_empty() {
        return Err(VaultError::Validation(
            "Encrypted content cannot be empty".to_string(),
        ));
    }
    if ciphertext.chars().count() > MAX_CIPHERTEXT_CHARS {
        return Err(VaultError::Validation(
            "Encrypted content exceeds maximum length".to_string(),
        ));
    }
    Ok(())
}

fn validate_owner_id(owner_id: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        return Err(VaultError::Validation(
            "Owner ID cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate caller-supplied plaintext length (1–5000 characters).
pub fn validate_content(content: &str) -> Result<()> {
    let length = content.chars().count();
    if length == 0 || length > MAX_CONTENT_CHARS {
        return Err(VaultError::Validation(format!(
            "Content must be between 1 and {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

/// A note that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewNote {
    ciphertext: String,
    owner_id: String,
    created_at: DateTime<Utc>,
}

impl NewNote {
    /// Build a new note from an already-encrypted envelope.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Validation` if the envelope is empty or longer
    /// than 4000 characters, or the owner id is empty.
    pub fn new(ciphertext: impl Into<String>, owner_id: impl Into<String>) -> Result<Self> {
        let ciphertext = ciphertext.into();
        let owner_id = owner_id.into();
        validate_ciphertext(&ciphertext)?;
        validate_owner_id(&owner_id)?;

        Ok(Self {
            ciphertext,
            owner_id,
            created_at: now(),
        })
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attach the storage-assigned id.
    pub(crate) fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            ciphertext: self.ciphertext,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: None,
        }
    }
}

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    ciphertext: String,
    owner_id: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Rehydrate a note read back from storage.
    ///
    /// Stored ciphertext is taken verbatim; a damaged envelope is reported
    /// when it is decrypted, not here.
    pub(crate) fn restore(
        id: NoteId,
        ciphertext: String,
        owner_id: String,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            ciphertext,
            owner_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Replace the envelope and stamp `updated_at`.
    ///
    /// `updated_at` never precedes `created_at`, even under clock skew.
    pub fn replace_ciphertext(&mut self, ciphertext: impl Into<String>) -> Result<()> {
        let ciphertext = ciphertext.into();
        validate_ciphertext(&ciphertext)?;

        self.ciphertext = ciphertext;
        self.updated_at = Some(now().max(self.created_at));
        Ok(())
    }
}

/// Caller-facing projection of a note with its plaintext content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecryptedNote {
    /// Storage-assigned identifier
    pub id: NoteId,

    /// Plaintext content
    pub content: String,

    /// Owning user
    pub owner_id: String,

    /// When this note was created
    pub created_at: DateTime<Utc>,

    /// Last content change, if any
    pub updated_at: Option<DateTime<Utc>>,
}

impl DecryptedNote {
    pub fn from_note(note: &Note, content: String) -> Self {
        Self {
            id: note.id,
            content,
            owner_id: note.owner_id.clone(),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}
