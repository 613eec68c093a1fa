//! Notes survive reopening the collection directory

use crate::common::{COLLECTION, KeywordEmbedder, note_service, open_collection};
use fastnotes::vector::CollectionMetadata;
use fastnotes::{DistanceMetric, PersistentCollection, SaveOutcome, StoreError, VectorStore};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_notes_survive_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let service = note_service(&dir);
        assert!(service.save_note("Buy milk").await.unwrap().is_saved());
        assert!(service.save_note("Standup meeting at ten").await.unwrap().is_saved());
    }

    let service = note_service(&dir);
    let listed = service.list_notes().await.unwrap();
    let documents: Vec<&str> = listed.notes.iter().map(|n| n.document.as_str()).collect();
    assert_eq!(documents, vec!["Buy milk", "Standup meeting at ten"]);

    // Duplicate detection sees notes written by the previous process
    match service.save_note("groceries: eggs").await.unwrap() {
        SaveOutcome::Duplicate { existing, .. } => assert_eq!(existing, "Buy milk"),
        other => panic!("expected a duplicate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_is_persisted() {
    let dir = TempDir::new().unwrap();

    {
        let service = note_service(&dir);
        service.save_note("Buy milk").await.unwrap();
        let id = fastnotes::NoteId::from_content("Buy milk");
        service.delete_note(id.as_str()).await.unwrap();
    }

    let collection = open_collection(&dir);
    assert_eq!(collection.count().unwrap(), 0);
    assert_eq!(collection.metadata().note_count, 0);
}

#[test]
fn test_layout_on_disk() {
    let dir = TempDir::new().unwrap();
    let collection = open_collection(&dir);
    collection.upsert("a", "Buy milk").unwrap();

    let path = dir.path().join(COLLECTION);
    assert_eq!(collection.path(), path.as_path());
    assert!(path.join("metadata.json").exists());
    assert!(path.join("records.json").exists());

    let metadata = CollectionMetadata::load(&path).unwrap();
    assert_eq!(metadata.model_name, "keyword-test-model");
    assert_eq!(metadata.metric, DistanceMetric::L2);
    assert_eq!(metadata.note_count, 1);
}

#[test]
fn test_reopen_with_other_metric_is_refused() {
    let dir = TempDir::new().unwrap();
    drop(open_collection(&dir));

    let result = PersistentCollection::open_or_create(
        dir.path(),
        COLLECTION,
        Arc::new(KeywordEmbedder),
        DistanceMetric::Cosine,
    );
    assert!(matches!(result, Err(StoreError::Incompatible { .. })));
}

#[test]
fn test_corrupted_records_are_reported() {
    let dir = TempDir::new().unwrap();
    let collection = open_collection(&dir);
    collection.upsert("a", "Buy milk").unwrap();
    drop(collection);

    let records = dir.path().join(COLLECTION).join("records.json");
    std::fs::write(&records, "{ not json").unwrap();

    let result = PersistentCollection::open_or_create(
        dir.path(),
        COLLECTION,
        Arc::new(KeywordEmbedder),
        DistanceMetric::L2,
    );
    assert!(matches!(result, Err(StoreError::Corrupted { .. })));
}
