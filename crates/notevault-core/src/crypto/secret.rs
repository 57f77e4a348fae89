//! Master secret validation.
//!
//! The master secret is the only input to key derivation that is not
//! persisted anywhere by notevault. Its absence is a fatal start-up error.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, VaultError};

/// Message used whenever no usable master secret is configured.
const MISSING_SECRET: &str =
    "Encryption master key not configured. Set NOTEVAULT_MASTER_KEY or [encryption] master_key.";

/// Validate that a master secret is usable for key derivation.
///
/// # Requirements
///
/// - Not empty or only whitespace
///
/// # Examples
///
/// ```
/// use notevault_core::crypto::validate_secret;
///
/// assert!(validate_secret("correct horse battery staple").is_ok());
/// assert!(validate_secret("   ").is_err());
/// ```
pub fn validate_secret(secret: &str) -> Result<()> {
    if secret.trim().is_empty() {
        return Err(VaultError::Configuration(MISSING_SECRET.to_string()));
    }
    Ok(())
}

/// Turn an optional configured value into a validated secret.
///
/// Returns `VaultError::Configuration` when the value is absent or blank.
pub fn require_secret(value: Option<String>) -> Result<SecretString> {
    let secret = SecretString::from(
        value.ok_or_else(|| VaultError::Configuration(MISSING_SECRET.to_string()))?,
    );
    validate_secret(secret.expose_secret())?;
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_secret() {
        assert!(validate_secret("a").is_ok());
        assert!(validate_secret("longer secret with spaces and symbols!@#").is_ok());
    }

    #[test]
    fn test_secret_empty() {
        assert!(validate_secret("").is_err());
        assert!(validate_secret("   ").is_err());
        assert!(validate_secret("\n\t").is_err());
    }

    #[test]
    fn test_require_secret_missing_is_configuration_error() {
        let result = require_secret(None);
        assert!(matches!(result, Err(VaultError::Configuration(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("master key not configured"));
    }

    #[test]
    fn test_require_secret_blank_is_configuration_error() {
        let result = require_secret(Some("  ".to_string()));
        assert!(matches!(result, Err(VaultError::Configuration(_))));
    }

    #[test]
    fn test_require_secret_keeps_value() {
        let secret = require_secret(Some("s3cret".to_string())).unwrap();
        assert_eq!(secret.expose_secret(), "s3cret");
    }
}
