//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! This module turns the configured master secret into the single 256-bit
//! key used for every note. Derivation is deterministic so that notes
//! written by a previous process remain readable.

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use super::secret::validate_secret;
use crate::error::{Result, VaultError};

/// Minimum (and default) PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Application-wide default salt.
///
/// Deployments should inject their own salt; every installation sharing this
/// salt and a secret derives the same key.
pub const DEFAULT_SALT: &[u8] = b"notevault.salt.v1";

/// Minimum accepted salt length in bytes.
const MIN_SALT_LENGTH: usize = 16;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// Immutable inputs to key derivation.
///
/// Built once from configuration and passed by reference; there is no
/// process-global key holder.
#[derive(Debug)]
pub struct EncryptionSettings {
    secret: SecretString,
    salt: Vec<u8>,
    iterations: u32,
}

impl EncryptionSettings {
    /// Settings with the default salt and iteration count.
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            salt: DEFAULT_SALT.to_vec(),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = salt.into();
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// A 256-bit key derived from the master secret.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped, reducing the window of exposure.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Wrap externally managed key bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the note encryption key from settings.
///
/// # Errors
///
/// Returns `VaultError::Configuration` if:
/// - The secret is empty or only whitespace
/// - The salt is shorter than 16 bytes
/// - The iteration count is below 100,000
///
/// # Examples
///
/// ```
/// use notevault_core::crypto::{derive_key, EncryptionSettings};
/// use secrecy::SecretString;
///
/// let settings = EncryptionSettings::new(SecretString::from("master-secret".to_string()));
/// let key = derive_key(&settings).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(settings: &EncryptionSettings) -> Result<DerivedKey> {
    validate_secret(settings.secret.expose_secret())?;

    if settings.salt.len() < MIN_SALT_LENGTH {
        return Err(VaultError::Configuration(format!(
            "Salt must be at least {} bytes",
            MIN_SALT_LENGTH
        )));
    }

    if settings.iterations < DEFAULT_ITERATIONS {
        return Err(VaultError::Configuration(format!(
            "Key derivation needs at least {} iterations (got {})",
            DEFAULT_ITERATIONS, settings.iterations
        )));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        settings.secret.expose_secret().as_bytes(),
        &settings.salt,
        settings.iterations,
        &mut key_bytes,
    );

    Ok(DerivedKey::from_bytes(key_bytes))
}
