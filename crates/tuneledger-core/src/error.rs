//! Error types for TuneLedger core operations.
//!
//! This module defines the error hierarchy for every layer of the protocol:
//! addressing, codec, validation, the mutation engine, and the external
//! signer/transport boundary. Errors name the violated condition; the CLI
//! layer maps them to user-facing messages and exit codes.

use thiserror::Error;

/// Result type alias for TuneLedger operations.
pub type Result<T> = std::result::Result<T, TuneLedgerError>;

/// Core error type for TuneLedger operations.
#[derive(Debug, Error)]
pub enum TuneLedgerError {
    // --- Input validation ---
    /// Input violates a field constraint
    #[error("Validation error: {0}")]
    Validation(String),

    // --- Record state ---
    /// Create targeted an address that already holds a record
    #[error("Already initialized: {0}")]
    AlreadyInitialized(String),

    /// Relationship toggle-on targeted an existing relationship record
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Required record or relationship is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Signer is not the record's authority
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Account list does not match the addresses the instruction requires
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    /// Checked counter arithmetic failed
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    // --- Codec ---
    /// Leading 8 bytes do not match the expected schema
    #[error("Unknown discriminator: {}", hex::encode(.0))]
    UnknownDiscriminator([u8; 8]),

    /// Fewer bytes remain than a field needs
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// Bytes remain after all declared fields were consumed
    #[error("Trailing bytes: {0} unconsumed")]
    TrailingBytes(usize),

    /// Boolean byte was neither 0 nor 1
    #[error("Invalid bool encoding: {0}")]
    InvalidBoolEncoding(u8),

    /// Option tag byte was neither 0 nor 1
    #[error("Invalid option tag: {0}")]
    InvalidOptionTag(u8),

    /// String field did not hold valid UTF-8
    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    // --- Addressing ---
    /// Combined seed payload exceeds the derivation limit
    #[error("Seed too long: {len} bytes (max {max})")]
    SeedTooLong { len: usize, max: usize },

    /// Seed component is empty or the seed set cannot produce an address
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    // --- Signatures and the external boundary ---
    /// Signature does not verify against the signer's key
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signer refused to sign
    #[error("Signing declined: {0}")]
    SigningDeclined(String),

    /// Ledger rejected the submission
    #[error("Rejected: {0}")]
    Rejected(Box<TuneLedgerError>),

    /// Submission did not confirm in time
    #[error("Timeout")]
    Timeout,

    /// Transport failure
    #[error("Network error: {0}")]
    NetworkError(String),

    // --- Storage ---
    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TuneLedgerError {
    /// Unwrap a transport rejection to the engine error that caused it.
    pub fn root_cause(&self) -> &TuneLedgerError {
        match self {
            TuneLedgerError::Rejected(inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl From<std::io::Error> for TuneLedgerError {
    fn from(err: std::io::Error) -> Self {
        TuneLedgerError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for TuneLedgerError {
    fn from(err: rusqlite::Error) -> Self {
        TuneLedgerError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_condition() {
        let err = TuneLedgerError::UnknownDiscriminator([0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 1]);
        assert_eq!(err.to_string(), "Unknown discriminator: deadbeef00000001");

        let err = TuneLedgerError::TruncatedInput {
            needed: 8,
            remaining: 3,
        };
        assert_eq!(
            err.to_string(),
            "Truncated input: needed 8 bytes, 3 remaining"
        );
    }

    #[test]
    fn test_root_cause_unwraps_rejections() {
        let err = TuneLedgerError::Rejected(Box::new(TuneLedgerError::NotFound(
            "track like".to_string(),
        )));
        assert!(matches!(err.root_cause(), TuneLedgerError::NotFound(_)));
    }
}
