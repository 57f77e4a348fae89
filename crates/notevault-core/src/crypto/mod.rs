//! Cryptographic operations for notevault.
//!
//! This module is the encryption boundary. It provides key derivation and
//! envelope encryption using well-audited libraries:
//! - **PBKDF2-HMAC-SHA256**: deterministic key derivation from the master secret
//! - **AES-256-GCM**: authenticated encryption of note content
//!
//! ## Security Model
//!
//! - One 256-bit key per process, derived once at start-up from configuration
//! - A fresh random 16-byte IV for every encryption
//! - Key material zeroized on drop and redacted from `Debug`
//! - Plaintext and key bytes are never logged
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft or leak of the note database, disk images and backups
//! - Tampering with stored ciphertext (detected by the GCM tag)
//!
//! We do NOT defend against:
//! - Compromised host / access to process memory
//! - Disclosure of the master secret

pub mod cipher;
pub mod key;
pub mod secret;

pub use cipher::{CipherEngine, IV_SIZE, TAG_SIZE};
pub use key::{derive_key, DerivedKey, EncryptionSettings, DEFAULT_ITERATIONS, DEFAULT_SALT};
pub use secret::{require_secret, validate_secret};
