//! Error types for notevault core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the service boundary decides
//! which of them reach a caller verbatim and which are collapsed into a
//! generic `Internal` failure.

use thiserror::Error;

/// Result type alias for notevault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for notevault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Bad input shape or length (caller can resubmit)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Note id does not exist
    #[error("{0}")]
    NotFound(String),

    /// Invalid argument to a cipher primitive
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Envelope could not be decoded into IV + ciphertext
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Envelope decoded but failed authentication or UTF-8 recovery
    #[error("Decryption failed: {0}")]
    DecryptionFailure(String),

    /// Missing or invalid secret, salt or KDF parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Persistence(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Opaque failure surfaced to callers; details are only logged
    #[error("{0}")]
    Internal(String),

    /// Operation aborted through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,
}

impl VaultError {
    /// Build the canonical not-found error for a note id.
    pub fn note_not_found(id: i64) -> Self {
        VaultError::NotFound(format!("Note with ID {} not found", id))
    }

    /// Whether this failure is part of the expected domain contract and may
    /// be shown to a caller with its specific message.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            VaultError::Validation(_)
                | VaultError::NotFound(_)
                | VaultError::InvalidInput(_)
                | VaultError::Cancelled
        )
    }

    /// Whether this failure signals corrupted or tampered ciphertext.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            VaultError::MalformedEnvelope(_) | VaultError::DecryptionFailure(_)
        )
    }
}

impl From<tokio::task::JoinError> for VaultError {
    fn from(err: tokio::task::JoinError) -> Self {
        VaultError::Persistence(format!("Storage task failed: {}", err))
    }
}
