//! The note service: duplicate policy and the four note operations.

use crate::config::{NotesConfig, Settings};
use crate::error::{NoteError, NoteResult, StoreResult};
use crate::notes::{DeleteOutcome, ListOutcome, NoteId, SaveGuard, SaveOutcome, SearchOutcome};
use crate::vector::{FastEmbedGenerator, PersistentCollection, VectorStore};
use std::sync::Arc;
use tracing::{debug, info};

/// When a new note counts as a duplicate, and how many notes a search returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicatePolicy {
    /// Nearest-note distance strictly below this blocks a save.
    pub threshold: f32,
    pub search_limit: usize,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self {
            threshold: 0.35,
            search_limit: 3,
        }
    }
}

impl From<&NotesConfig> for DuplicatePolicy {
    fn from(config: &NotesConfig) -> Self {
        Self {
            threshold: config.duplicate_threshold,
            search_limit: config.search_limit,
        }
    }
}

/// Saves, searches, lists and deletes notes against a [`VectorStore`].
///
/// Store calls are blocking (embedding runs on the CPU), so each one is
/// moved onto tokio's blocking pool.
pub struct NoteService {
    store: Arc<dyn VectorStore>,
    policy: DuplicatePolicy,
    guard: Option<SaveGuard>,
}

impl std::fmt::Debug for NoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteService")
            .field("policy", &self.policy)
            .field("serialize_saves", &self.guard.is_some())
            .finish()
    }
}

impl NoteService {
    /// Service over `store` with identical concurrent saves serialized.
    pub fn new(store: Arc<dyn VectorStore>, policy: DuplicatePolicy) -> Self {
        Self {
            store,
            policy,
            guard: Some(SaveGuard::new()),
        }
    }

    /// Turn the per-content save guard on or off.
    #[must_use]
    pub fn with_serialized_saves(mut self, enabled: bool) -> Self {
        self.guard = enabled.then(SaveGuard::new);
        self
    }

    /// Load the embedding model and open the configured collection.
    ///
    /// This may download the model on first run.
    pub fn from_settings(settings: &Settings) -> NoteResult<Self> {
        let store = open_store(settings)?;
        Ok(Self::new(store, DuplicatePolicy::from(&settings.notes))
            .with_serialized_saves(settings.notes.serialize_saves))
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Save `content` unless a stored note is within the duplicate threshold.
    ///
    /// # Errors
    /// Store and embedding failures are returned as-is; nothing is retried.
    pub async fn save_note(&self, content: &str) -> NoteResult<SaveOutcome> {
        let id = NoteId::from_content(content);

        let _permit = match &self.guard {
            Some(guard) => Some(guard.acquire(&id).await),
            None => None,
        };

        let query = content.to_string();
        let nearest = self
            .blocking(move |store| store.query(&query, 1))
            .await?
            .into_iter()
            .next();

        if let Some(hit) = nearest {
            if hit.distance < self.policy.threshold {
                info!(
                    "Refused near-duplicate note (distance {:.4} to {})",
                    hit.distance, hit.id
                );
                return Ok(SaveOutcome::Duplicate {
                    existing: hit.document,
                    existing_id: NoteId::from(hit.id),
                    distance: hit.distance,
                });
            }
            debug!(
                "Nearest note {} at distance {:.4}, saving",
                hit.id, hit.distance
            );
        }

        let document = content.to_string();
        let insert_id = id.clone();
        self.blocking(move |store| store.upsert(insert_id.as_str(), &document))
            .await?;

        info!("Saved note {id}");
        Ok(SaveOutcome::Saved { id })
    }

    /// Notes nearest in meaning to `query`, nearest first.
    pub async fn search_notes(&self, query: &str) -> NoteResult<SearchOutcome> {
        let text = query.to_string();
        let limit = self.policy.search_limit;
        let notes = self.blocking(move |store| store.query(&text, limit)).await?;

        debug!("Search returned {} notes", notes.len());
        Ok(SearchOutcome { notes })
    }

    /// Delete by id. Unknown ids are acknowledged the same way.
    pub async fn delete_note(&self, note_id: &str) -> NoteResult<DeleteOutcome> {
        let id = NoteId::from(note_id);
        let target = id.clone();
        self.blocking(move |store| store.delete(target.as_str()))
            .await?;

        info!("Deleted note {id}");
        Ok(DeleteOutcome { id })
    }

    /// Every stored note in store order.
    pub async fn list_notes(&self) -> NoteResult<ListOutcome> {
        let notes = self.blocking(|store| store.get_all()).await?;
        Ok(ListOutcome { notes })
    }

    async fn blocking<T, F>(&self, op: F) -> NoteResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn VectorStore) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| NoteError::Task(e.to_string()))?;
        Ok(result?)
    }
}

/// Build the production store for `settings`.
pub fn open_store(settings: &Settings) -> NoteResult<Arc<dyn VectorStore>> {
    let embedder = FastEmbedGenerator::new(
        &settings.embedding.model,
        settings.embedding_cache_dir(),
        settings.embedding.show_download_progress,
    )?;

    let collection = PersistentCollection::open_or_create(
        &settings.store.path,
        &settings.store.collection,
        Arc::new(embedder),
        settings.store.metric,
    )?;

    Ok(Arc::new(collection))
}
