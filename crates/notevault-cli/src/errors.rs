//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use notevault_core::VaultError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, note)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),

    /// Missing or unusable configuration
    Config {
        message: String,
        hint: Option<String>,
    },

    /// Stored note could not be decrypted
    IntegrityFailed { message: String, hint: String },

    /// Interrupted before completion
    Cancelled,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::IntegrityFailed { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::Config { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Cancelled => write!(f, "Interrupted"),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Create a Config error with message and hint.
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Config { .. } => exit_codes::CONFIG,
            CliError::IntegrityFailed { .. } => exit_codes::INTEGRITY_FAILED,
            CliError::Cancelled => exit_codes::CANCELLED,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }

    /// Sort a core error into the CLI category that decides its exit code.
    ///
    /// Returns `None` for failures that stay general (exit code 1).
    pub fn from_vault(err: &VaultError) -> Option<Self> {
        match err {
            VaultError::NotFound(message) => Some(CliError::not_found(
                message.clone(),
                "Hint: Run `notevault list --owner <OWNER>` to find note IDs.",
            )),
            VaultError::Validation(_) | VaultError::InvalidInput(_) => {
                Some(CliError::invalid_input(err.to_string()))
            }
            VaultError::Configuration(message) => Some(CliError::config_with_hint(
                message.clone(),
                "Hint: Run `notevault init` or check the [encryption] section of your config.",
            )),
            VaultError::MalformedEnvelope(_) | VaultError::DecryptionFailure(_) => {
                Some(CliError::IntegrityFailed {
                    message: err.to_string(),
                    hint: "Hint: The note was written with a different key or has been altered."
                        .to_string(),
                })
            }
            VaultError::Cancelled => Some(CliError::Cancelled),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_per_category() {
        let not_found = CliError::from_vault(&VaultError::note_not_found(9)).unwrap();
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);
        assert!(not_found.to_string().contains("Note with ID 9 not found"));

        let invalid = CliError::from_vault(&VaultError::Validation("too long".into())).unwrap();
        assert_eq!(invalid.exit_code(), exit_codes::INVALID_INPUT);

        let config = CliError::from_vault(&VaultError::Configuration("no key".into())).unwrap();
        assert_eq!(config.exit_code(), exit_codes::CONFIG);

        let integrity =
            CliError::from_vault(&VaultError::DecryptionFailure("bad tag".into())).unwrap();
        assert_eq!(integrity.exit_code(), exit_codes::INTEGRITY_FAILED);

        let cancelled = CliError::from_vault(&VaultError::Cancelled).unwrap();
        assert_eq!(cancelled.exit_code(), exit_codes::CANCELLED);
    }

    #[test]
    fn test_internal_errors_stay_general() {
        assert!(CliError::from_vault(&VaultError::Internal("boom".into())).is_none());
        assert!(CliError::from_vault(&VaultError::Persistence("disk".into())).is_none());
    }
}
