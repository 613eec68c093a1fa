//! Duplicate detection with the real FastEmbed model
//!
//! Downloads BAAI/bge-small-en-v1.5 on first run, so these are ignored by
//! default. Run with `cargo test -- --ignored test_real_model`.

use fastnotes::notes::DuplicatePolicy;
use fastnotes::{DistanceMetric, FastEmbedGenerator, NoteService, PersistentCollection};
use std::sync::Arc;
use tempfile::TempDir;

fn real_service(dir: &TempDir) -> NoteService {
    let cache = dir.path().join("models");
    let embedder = FastEmbedGenerator::new("BAAI/bge-small-en-v1.5", cache, false)
        .expect("Failed to load embedding model");
    let collection = PersistentCollection::open_or_create(
        dir.path(),
        "private_knowledge",
        Arc::new(embedder),
        DistanceMetric::L2,
    )
    .expect("Failed to open collection");
    NoteService::new(Arc::new(collection), DuplicatePolicy::default())
}

#[tokio::test]
#[ignore = "Downloads the embedding model"]
async fn test_real_model_paraphrase_is_refused() {
    let dir = TempDir::new().unwrap();
    let service = real_service(&dir);

    assert!(service.save_note("Buy milk").await.unwrap().is_saved());
    let outcome = service.save_note("Purchase milk").await.unwrap();
    println!("Paraphrase outcome: {outcome:?}");
    assert!(!outcome.is_saved());
}

#[tokio::test]
#[ignore = "Downloads the embedding model"]
async fn test_real_model_unrelated_note_is_saved() {
    let dir = TempDir::new().unwrap();
    let service = real_service(&dir);

    assert!(service.save_note("Buy milk").await.unwrap().is_saved());
    assert!(
        service
            .save_note("Quantum computing uses qubits")
            .await
            .unwrap()
            .is_saved()
    );

    let found = service.search_notes("dairy shopping").await.unwrap();
    assert_eq!(found.notes[0].document, "Buy milk");
}
