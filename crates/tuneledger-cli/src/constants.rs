//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap's usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, ledger file, key file, record).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments, including field validation.
    pub const INVALID_INPUT: i32 = 4;

    /// The ledger refused the instruction.
    pub const REJECTED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// File name of the ledger database inside the data directory.
pub const LEDGER_FILE_NAME: &str = "ledger.db";

/// File name of the default key file inside the config directory.
pub const KEYPAIR_FILE_NAME: &str = "id.key";

/// Log filter used when neither `TUNELEDGER_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";
