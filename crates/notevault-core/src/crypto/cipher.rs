//! Envelope encryption for note content.
//!
//! Wire format (text, persisted as-is):
//!
//! ```text
//! base64( IV[16] || AES-256-GCM ciphertext || tag[16] )
//! ```
//!
//! The standard base64 alphabet with padding is used. Anyone reading raw
//! storage must apply exactly this decoding, with the process key, to
//! recover plaintext.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::key::{derive_key, DerivedKey, EncryptionSettings};
use crate::error::{Result, VaultError};

/// IV length prepended to every envelope.
pub const IV_SIZE: usize = 16;

/// GCM authentication tag length appended by the cipher.
pub const TAG_SIZE: usize = 16;

/// AES-256-GCM with a 128-bit IV.
type NoteCipher = AesGcm<Aes256, U16>;

/// Key-holding encrypt/decrypt primitive.
///
/// Created once per process and shared read-only; every call draws its own
/// IV, so concurrent use needs no synchronization.
#[derive(Debug)]
pub struct CipherEngine {
    key: DerivedKey,
}

impl CipherEngine {
    pub fn new(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Derive the key from settings and build the engine.
    pub fn from_settings(settings: &EncryptionSettings) -> Result<Self> {
        Ok(Self::new(derive_key(settings)?))
    }

    fn cipher(&self) -> Result<NoteCipher> {
        NoteCipher::new_from_slice(self.key.as_bytes())
            .map_err(|e| VaultError::Internal(format!("Cipher initialization failed: {}", e)))
    }

    /// Encrypt plaintext into a text envelope.
    ///
    /// Identical plaintext encrypted twice yields different envelopes.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if `plaintext` is empty.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Err(VaultError::InvalidInput(
                "Plain text cannot be empty".to_string(),
            ));
        }

        let mut iv = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = self
            .cipher()?
            .encrypt(GenericArray::from_slice(&iv), plaintext.as_bytes())
            .map_err(|_| VaultError::Internal("Encryption failed".to_string()))?;

        let mut envelope = Vec::with_capacity(IV_SIZE + ciphertext.len());
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(envelope))
    }

    /// Decrypt a text envelope produced by [`CipherEngine::encrypt`].
    ///
    /// # Errors
    ///
    /// - `VaultError::InvalidInput` if `envelope` is empty
    /// - `VaultError::MalformedEnvelope` if it is not base64 or too short to
    ///   hold an IV and a tag
    /// - `VaultError::DecryptionFailure` if authentication fails (tampering,
    ///   wrong key) or the plaintext is not UTF-8
    pub fn decrypt(&self, envelope: &str) -> Result<String> {
        if envelope.is_empty() {
            return Err(VaultError::InvalidInput(
                "Encrypted text cannot be empty".to_string(),
            ));
        }

        let raw = STANDARD
            .decode(envelope)
            .map_err(|e| VaultError::MalformedEnvelope(format!("Invalid base64 format: {}", e)))?;

        if raw.len() < IV_SIZE + TAG_SIZE {
            return Err(VaultError::MalformedEnvelope(format!(
                "Envelope is too short ({} bytes) to contain IV and tag",
                raw.len()
            )));
        }

        let (iv, ciphertext) = raw.split_at(IV_SIZE);
        let plaintext = self
            .cipher()?
            .decrypt(GenericArray::from_slice(iv), ciphertext)
            .map_err(|_| {
                VaultError::DecryptionFailure(
                    "Ciphertext failed authentication (corrupted or tampered)".to_string(),
                )
            })?;

        String::from_utf8(plaintext).map_err(|_| {
            VaultError::DecryptionFailure("Decrypted content is not valid UTF-8".to_string())
        })
    }
}
