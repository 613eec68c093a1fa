//! Shared helpers for integration tests.
//!
//! The real embedding model is a large download, so these tests embed with
//! a keyword model: every topic owns one axis and texts are normalized.
//! Notes on the same topic land at distance 0, unrelated ones at 2.0
//! (squared L2 between orthogonal unit vectors).

#![allow(dead_code)]

use fastnotes::notes::DuplicatePolicy;
use fastnotes::vector::{VectorDimension, VectorError};
use fastnotes::{
    DistanceMetric, EmbeddingGenerator, NoteService, PersistentCollection, QueryMatch,
    StoreResult, StoredNote, VectorStore,
};
use std::sync::Arc;
use tempfile::TempDir;

pub const COLLECTION: &str = "private_knowledge";

const TOPICS: &[&[&str]] = &[
    &["milk", "groceries", "bread", "eggs", "buy", "shopping"],
    &["quantum", "qubit", "computing", "physics"],
    &["meeting", "standup", "calendar", "schedule"],
    &["rust", "cargo", "borrow", "compiler"],
    &["gym", "run", "workout", "exercise"],
    &["dentist", "doctor", "appointment"],
];

pub struct KeywordEmbedder;

impl EmbeddingGenerator for KeywordEmbedder {
    fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError> {
        Ok(texts.iter().map(|text| embed(text)).collect())
    }

    fn dimension(&self) -> VectorDimension {
        VectorDimension::new(TOPICS.len() + 1).unwrap()
    }

    fn model_name(&self) -> &str {
        "keyword-test-model"
    }
}

fn embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; TOPICS.len() + 1];
    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if let Some(axis) = TOPICS.iter().position(|topic| topic.contains(&word)) {
            vector[axis] += 1.0;
        }
    }
    if vector.iter().all(|v| *v == 0.0) {
        vector[TOPICS.len()] = 1.0;
    }
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    vector.iter().map(|v| v / norm).collect()
}

pub fn open_collection(dir: &TempDir) -> PersistentCollection {
    PersistentCollection::open_or_create(
        dir.path(),
        COLLECTION,
        Arc::new(KeywordEmbedder),
        DistanceMetric::L2,
    )
    .expect("Failed to open collection")
}

pub fn note_service(dir: &TempDir) -> NoteService {
    NoteService::new(Arc::new(open_collection(dir)), DuplicatePolicy::default())
}

/// A store whose every call fails, for error propagation tests.
pub struct BrokenStore;

impl VectorStore for BrokenStore {
    fn query(&self, _text: &str, _k: usize) -> StoreResult<Vec<QueryMatch>> {
        Err(VectorError::EmbeddingFailed("embedding backend unavailable".to_string()).into())
    }

    fn upsert(&self, _id: &str, _document: &str) -> StoreResult<()> {
        Err(VectorError::EmbeddingFailed("embedding backend unavailable".to_string()).into())
    }

    fn delete(&self, _id: &str) -> StoreResult<()> {
        Err(VectorError::EmbeddingFailed("embedding backend unavailable".to_string()).into())
    }

    fn get_all(&self) -> StoreResult<Vec<StoredNote>> {
        Err(VectorError::EmbeddingFailed("embedding backend unavailable".to_string()).into())
    }
}
