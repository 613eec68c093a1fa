/// The main library module for fastnotes
pub mod config;
pub mod error;
pub mod init;
pub mod io;
pub mod logging;
pub mod mcp;
pub mod notes;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{McpError, McpResult, NoteError, NoteResult, StoreError, StoreResult};
pub use notes::{
    DeleteOutcome, ListOutcome, NoteId, NoteService, SaveOutcome, SearchOutcome, calculate_hash,
};
pub use vector::{
    DistanceMetric, EmbeddingGenerator, FastEmbedGenerator, PersistentCollection, QueryMatch,
    StoredNote, VectorStore,
};
