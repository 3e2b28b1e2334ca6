//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core errors that reach `main`
//! unwrapped are classified by [`exit_code_for`].

use std::fmt;

use tuneledger_core::TuneLedgerError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, ledger file, key file, record)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),

    /// The ledger refused an instruction
    Rejected {
        message: String,
        hint: Option<String>,
    },

    /// Integrity check reported violations
    IntegrityFailed(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Rejected { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::IntegrityFailed(count) => {
                write!(f, "Integrity check failed: {} violation(s)", count)
            }
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

    /// Create a Rejected error with a hint.
    pub fn rejected_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::Rejected {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Rejected { .. } => exit_codes::REJECTED,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for a core error, classified by what caused it.
pub fn core_exit_code(err: &TuneLedgerError) -> i32 {
    match err.root_cause() {
        TuneLedgerError::NotFound(_) => exit_codes::NOT_FOUND,
        TuneLedgerError::Validation(_)
        | TuneLedgerError::SeedTooLong { .. }
        | TuneLedgerError::InvalidSeed(_) => exit_codes::INVALID_INPUT,
        _ if matches!(err, TuneLedgerError::Rejected(_)) => exit_codes::REJECTED,
        _ => 1,
    }
}

/// Exit code for any error that reaches `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(core) = err.downcast_ref::<TuneLedgerError>() {
        return core_exit_code(core);
    }
    1
}
