//! Embedding and vector storage for notes.
//!
//! The note service talks to two narrow seams defined here:
//! [`EmbeddingGenerator`] turns text into vectors and [`VectorStore`]
//! keeps (id, document, embedding) records and answers nearest-neighbour
//! queries by text. [`FastEmbedGenerator`] and [`PersistentCollection`]
//! are the production implementations.
//!
//! # Storage layout
//! ```text
//! <store.path>/<collection>/
//!   metadata.json   model, dimension, metric, counts, timestamps
//!   records.json    [{ id, document, embedding }, ...]
//! ```

mod collection;
mod embedding;
mod metadata;
mod store;
mod types;

pub use collection::PersistentCollection;
pub(crate) use collection::write_atomic;
#[cfg(test)]
pub use embedding::MockEmbeddingGenerator;
pub use embedding::{
    EmbeddingGenerator, FastEmbedGenerator, SUPPORTED_MODELS, model_to_string,
    parse_embedding_model,
};
pub use metadata::{CollectionMetadata, get_utc_timestamp};
pub use store::{QueryMatch, StoredNote, VectorStore};
pub use types::{
    DistanceMetric, VECTOR_DIMENSION_384, VectorDimension, VectorError, cosine_similarity,
};
