//! Note operations over the vector store.
//!
//! [`NoteService`] owns the duplicate policy: a new note is refused when
//! the nearest stored note lies closer than the configured threshold.
//! Notes are identified by the SHA-256 of their content ([`NoteId`]).
//! Each operation returns an outcome whose `Display` is the text shown to
//! the tool caller.

mod guard;
mod id;
mod outcome;
mod service;

pub use guard::{SaveGuard, SavePermit};
pub use id::{NoteId, calculate_hash};
pub use outcome::{DeleteOutcome, ListOutcome, SaveOutcome, SearchOutcome};
pub use service::{DuplicatePolicy, NoteService, open_store};
