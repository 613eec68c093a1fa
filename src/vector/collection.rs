//! File-backed note collection.
//!
//! Records live in memory behind a lock and are written through to
//! `records.json` on every mutation; `metadata.json` tracks the model and
//! metric the collection was built with. Queries are an exact scan, which
//! is plenty for a personal note history.

use crate::error::{StoreError, StoreResult};
use crate::vector::{
    CollectionMetadata, DistanceMetric, EmbeddingGenerator, QueryMatch, StoredNote, VectorStore,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const RECORDS_FILE: &str = "records.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NoteRecord {
    id: String,
    document: String,
    embedding: Vec<f32>,
}

#[derive(Debug)]
struct CollectionState {
    metadata: CollectionMetadata,
    records: Vec<NoteRecord>,
}

/// A named, persistent collection of embedded notes.
pub struct PersistentCollection {
    path: PathBuf,
    embedder: Arc<dyn EmbeddingGenerator>,
    metric: DistanceMetric,
    state: RwLock<CollectionState>,
}

impl std::fmt::Debug for PersistentCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("PersistentCollection")
            .field("path", &self.path)
            .field("metric", &self.metric)
            .field("records", &state.records.len())
            .field("model", &state.metadata.model_name)
            .finish()
    }
}

impl PersistentCollection {
    /// Open the collection `name` under `root`, creating it if needed.
    ///
    /// # Errors
    /// Fails if the directory cannot be created, the files are unreadable,
    /// or the collection was built with a different model or metric.
    pub fn open_or_create(
        root: &Path,
        name: &str,
        embedder: Arc<dyn EmbeddingGenerator>,
        metric: DistanceMetric,
    ) -> StoreResult<Self> {
        let path = root.join(name);
        std::fs::create_dir_all(&path).map_err(|e| StoreError::FileWrite {
            path: path.clone(),
            source: e,
        })?;

        let state = if CollectionMetadata::exists(&path) {
            let metadata = CollectionMetadata::load(&path)?;
            metadata.ensure_compatible(embedder.model_name(), embedder.dimension(), metric)?;
            let records = load_records(&path)?;

            if records.len() != metadata.note_count {
                warn!(
                    "Expected {} notes but found {} in {}",
                    metadata.note_count,
                    records.len(),
                    path.display()
                );
            }
            info!(
                "Opened collection '{name}' with {} notes at {}",
                records.len(),
                path.display()
            );
            CollectionState { metadata, records }
        } else {
            let metadata = CollectionMetadata::new(
                embedder.model_name().to_string(),
                embedder.dimension(),
                metric,
            );
            let mut state = CollectionState {
                metadata,
                records: Vec::new(),
            };
            commit(&path, &mut state, Vec::new())?;
            info!("Created collection '{name}' at {}", path.display());
            state
        };

        Ok(Self {
            path,
            embedder,
            metric,
            state: RwLock::new(state),
        })
    }

    /// Directory holding this collection's files.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the collection metadata.
    pub fn metadata(&self) -> CollectionMetadata {
        self.state.read().metadata.clone()
    }

    fn embed(&self, text: &str) -> StoreResult<Vec<f32>> {
        let embedding = self.embedder.embed_one(text)?;
        self.embedder.dimension().validate_vector(&embedding)?;
        Ok(embedding)
    }
}

impl VectorStore for PersistentCollection {
    fn query(&self, text: &str, k: usize) -> StoreResult<Vec<QueryMatch>> {
        if k == 0 || self.state.read().records.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embed(text)?;
        let state = self.state.read();

        let mut matches: Vec<QueryMatch> = state
            .records
            .iter()
            .map(|record| QueryMatch {
                id: record.id.clone(),
                document: record.document.clone(),
                distance: self.metric.distance(&query_embedding, &record.embedding),
            })
            .collect();

        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(k);

        debug!(
            "query k={k} over {} notes, nearest distance {:?}",
            state.records.len(),
            matches.first().map(|m| m.distance)
        );
        Ok(matches)
    }

    fn upsert(&self, id: &str, document: &str) -> StoreResult<()> {
        let embedding = self.embed(document)?;
        let record = NoteRecord {
            id: id.to_string(),
            document: document.to_string(),
            embedding,
        };

        let mut state = self.state.write();
        let mut records = state.records.clone();
        match records.iter().position(|r| r.id == id) {
            Some(pos) => records[pos] = record,
            None => records.push(record),
        }
        commit(&self.path, &mut state, records)?;

        debug!("upserted note {id} ({} notes)", state.records.len());
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write();
        let Some(pos) = state.records.iter().position(|r| r.id == id) else {
            debug!("delete of unknown note {id} ignored");
            return Ok(());
        };

        let mut records = state.records.clone();
        records.remove(pos);
        commit(&self.path, &mut state, records)?;

        debug!("deleted note {id} ({} notes)", state.records.len());
        Ok(())
    }

    fn get_all(&self) -> StoreResult<Vec<StoredNote>> {
        Ok(self
            .state
            .read()
            .records
            .iter()
            .map(|r| StoredNote {
                id: r.id.clone(),
                document: r.document.clone(),
            })
            .collect())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.state.read().records.len())
    }
}

fn load_records(path: &Path) -> StoreResult<Vec<NoteRecord>> {
    let records_path = path.join(RECORDS_FILE);
    if !records_path.exists() {
        warn!(
            "No {RECORDS_FILE} next to collection metadata in {}, starting empty",
            path.display()
        );
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(&records_path).map_err(|e| StoreError::FileRead {
        path: records_path.clone(),
        source: e,
    })?;

    serde_json::from_str(&json).map_err(|e| StoreError::Corrupted {
        path: records_path,
        reason: e.to_string(),
        suggestion: "The records file may be corrupted. Move the collection aside.".to_string(),
    })
}

fn encode_records(records_path: &Path, records: &[NoteRecord]) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| StoreError::Corrupted {
        path: records_path.to_path_buf(),
        reason: format!("Failed to serialize records: {e}"),
        suggestion: "This is likely a bug in the code".to_string(),
    })
}

/// Write `records` and refreshed metadata, then adopt them in memory.
///
/// Memory is only touched once both files are written. If the metadata
/// write fails, `records.json` is put back to the records still in memory.
fn commit(path: &Path, state: &mut CollectionState, records: Vec<NoteRecord>) -> StoreResult<()> {
    let records_path = path.join(RECORDS_FILE);
    write_atomic(&records_path, &encode_records(&records_path, &records)?)?;

    let mut metadata = state.metadata.clone();
    metadata.update(records.len());
    if let Err(e) = metadata.save(path) {
        let restored = encode_records(&records_path, &state.records)
            .and_then(|previous| write_atomic(&records_path, &previous));
        if let Err(restore_err) = restored {
            warn!(
                "Could not restore {} after a failed metadata write: {restore_err}",
                records_path.display()
            );
        }
        return Err(e);
    }

    state.records = records;
    state.metadata = metadata;
    Ok(())
}

/// Replace `path` with `bytes` via a temp file in the same directory.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let write_err = |e: std::io::Error| StoreError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
