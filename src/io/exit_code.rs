//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success, including empty searches and deletes of unknown ids
//! - `1`: General error
//! - `2`: Blocking error, the store cannot be used as configured
//! - `3-125`: Specific recoverable outcomes and errors
//! - `126-255`: Reserved by shell

use crate::error::{NoteError, StoreError};
use crate::notes::SaveOutcome;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Critical error that should halt automation (code 2)
    BlockingError = 2,

    /// Save refused because a similar note exists (code 3)
    Duplicate = 3,

    /// Missing or malformed tool arguments (code 4)
    InvalidArguments = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Collection files are damaged (code 7)
    StoreCorrupted = 7,

    /// Embedding model failed to load or run (code 8)
    ModelError = 8,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Exit code for a save: a refused duplicate is reported distinctly.
    pub fn from_save_outcome(outcome: &SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Saved { .. } => ExitCode::Success,
            SaveOutcome::Duplicate { .. } => ExitCode::Duplicate,
        }
    }

    /// Convert a `NoteError` to the appropriate exit code.
    pub fn from_error(error: &NoteError) -> Self {
        match error {
            NoteError::Store(store) => match store {
                StoreError::FileRead { .. } | StoreError::FileWrite { .. } => ExitCode::IoError,
                StoreError::Corrupted { .. } => ExitCode::StoreCorrupted,
                // Reopening with another model or a newer format cannot succeed on retry
                StoreError::Incompatible { .. } | StoreError::UnsupportedVersion { .. } => {
                    ExitCode::BlockingError
                }
                StoreError::Vector(_) => ExitCode::ModelError,
            },
            NoteError::Task(_) | NoteError::Encode(_) => ExitCode::GeneralError,
        }
    }

    /// Check if this exit code indicates a blocking error.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, ExitCode::BlockingError)
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Get a human-readable description of the exit code.
    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::BlockingError => "Blocking error - automation should halt",
            ExitCode::Duplicate => "Similar note already exists",
            ExitCode::InvalidArguments => "Invalid arguments",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
            ExitCode::StoreCorrupted => "Store corrupted",
            ExitCode::ModelError => "Embedding model error",
        }
    }
}
