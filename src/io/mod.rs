//! Input/Output handling for the CLI.
//!
//! This module provides:
//! - Tool argument parsing for `fastnotes mcp`
//! - Unified output formatting (text, JSON)
//! - Consistent exit codes

pub mod args;
pub mod exit_code;
pub mod format;

pub use exit_code::ExitCode;
pub use format::{ErrorDetails, JsonResponse, OutputFormat, ResponseMeta};
