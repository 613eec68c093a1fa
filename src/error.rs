//! Error types for the note service
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use crate::vector::VectorError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the persistent note collection
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {reason}\nSuggestion: {suggestion}")]
    Corrupted {
        path: PathBuf,
        reason: String,
        suggestion: String,
    },

    #[error("Collection was built with {found} but {expected} is configured\nSuggestion: {suggestion}")]
    Incompatible {
        expected: String,
        found: String,
        suggestion: String,
    },

    #[error("Collection format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error(transparent)]
    Vector(#[from] VectorError),
}

impl StoreError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::Corrupted { .. } => "STORE_CORRUPTED",
            Self::Incompatible { .. } => "STORE_INCOMPATIBLE",
            Self::UnsupportedVersion { .. } => "UNSUPPORTED_VERSION",
            Self::Vector(_) => "EMBEDDING_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } | Self::FileWrite { .. } => vec![
                "Check that the store directory exists and you have read/write permissions",
                "Check disk space",
            ],
            Self::Corrupted { .. } => vec![
                "Move the damaged collection aside and start a fresh one",
                "Check for disk errors or filesystem corruption",
            ],
            Self::Incompatible { .. } => vec![
                "Point [store] collection at a new name for the new model or metric",
                "Or restore the previous [embedding] model / [store] metric settings",
            ],
            Self::UnsupportedVersion { .. } => vec!["Upgrade fastnotes to read this collection"],
            Self::Vector(_) => vec![
                "Ensure the embedding model could be downloaded (first run needs network)",
                "Check [embedding] cache_dir permissions",
            ],
        }
    }
}

/// Errors surfaced by the note service
///
/// Collaborator failures are wrapped, never translated.
#[derive(Error, Debug)]
pub enum NoteError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Failed to encode result as JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl NoteError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::Store(e) => e.status_code(),
            Self::Task(_) => "TASK_FAILED".to_string(),
            Self::Encode(_) => "ENCODE_ERROR".to_string(),
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Store(e) => e.recovery_suggestions(),
            Self::Task(_) => vec!["Retry the operation"],
            Self::Encode(_) => vec!["Retry without --json to see the plain text result"],
        }
    }
}

impl From<VectorError> for NoteError {
    fn from(e: VectorError) -> Self {
        Self::Store(StoreError::Vector(e))
    }
}

/// Errors specific to MCP operations
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Failed to initialize MCP server: {reason}")]
    ServerInitError { reason: String },

    #[error("MCP client error: {reason}")]
    ClientError { reason: String },

    #[error("Invalid tool arguments: {reason}")]
    InvalidArguments { reason: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
}

/// Result type alias for collection operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for note service operations
pub type NoteResult<T> = Result<T, NoteError>;

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;
