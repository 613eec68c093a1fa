//! Results of note operations.
//!
//! `Display` renders the text a tool caller sees; `Serialize` carries the
//! same result as structured data for `--json` output.

use crate::notes::NoteId;
use crate::vector::{QueryMatch, StoredNote};
use serde::Serialize;
use std::fmt;

const BULLET: &str = "•";

/// What happened to a `save_note` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// The note was stored under `id`.
    Saved { id: NoteId },
    /// A stored note was closer than the duplicate threshold; nothing was written.
    Duplicate {
        existing: String,
        existing_id: NoteId,
        distance: f32,
    },
}

impl SaveOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved { .. } => write!(f, "Note saved successfully using local FastEmbed."),
            Self::Duplicate { existing, .. } => write!(
                f,
                "SEMANTIC DUPLICATE DETECTED\nExisting Note: \"{existing}\"\nThis covers the same topic. Should I merge or ignore?"
            ),
        }
    }
}

/// Notes nearest to a search query, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub notes: Vec<QueryMatch>,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.notes.is_empty() {
            return write!(f, "No relevant notes found in your history.");
        }
        let lines: Vec<String> = self
            .notes
            .iter()
            .map(|note| format!("{BULLET} {}", note.document))
            .collect();
        write!(f, "Relevant Context Found:\n{}", lines.join("\n"))
    }
}

/// Acknowledgement of a delete. Issued whether or not the id existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub id: NoteId,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note deleted successfully.")
    }
}

/// Every stored note in store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListOutcome {
    pub notes: Vec<StoredNote>,
}

impl fmt::Display for ListOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .notes
            .iter()
            .map(|note| format!("{BULLET} {}", note.document))
            .collect();
        // The header is emitted even for an empty history
        write!(f, "Notes in your history:\n{}", lines.join("\n"))
    }
}
