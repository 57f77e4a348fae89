//! Constants used throughout the CLI.

/// Environment variable holding the master secret.
pub const MASTER_KEY_ENV: &str = "NOTEVAULT_MASTER_KEY";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "NOTEVAULT_CONFIG";

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "NOTEVAULT_DB";

/// Directory name used under the XDG config and data homes.
pub const APP_DIR: &str = "notevault";

/// Bytes of random salt written by `notevault init`.
pub const INIT_SALT_BYTES: usize = 32;

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, note).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Missing or invalid configuration (master key, salt, iterations).
    pub const CONFIG: i32 = 5;

    /// Stored ciphertext failed authentication or could not be decoded.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// Interrupted by Ctrl-C.
    pub const CANCELLED: i32 = 130;
}
