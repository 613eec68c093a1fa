//! Global fastnotes directories.
//!
//! Per-user state lives under `~/.fastnotes`; the embedding model cache is
//! shared by every workspace so the model downloads only once.

use std::path::PathBuf;

/// Root of per-user state, `~/.fastnotes`.
///
/// Falls back to `./.fastnotes` when no home directory can be resolved.
pub fn fastnotes_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fastnotes")
}

/// Shared cache for downloaded embedding models.
pub fn models_dir() -> PathBuf {
    fastnotes_home().join("models")
}
