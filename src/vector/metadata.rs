//! Metadata tracking for collection persistence.
//!
//! Records the embedding model, dimension and distance metric a collection
//! was built with so that a reopen with different settings is caught
//! instead of silently mixing incomparable vectors.

use crate::error::{StoreError, StoreResult};
use crate::vector::{DistanceMetric, VectorDimension};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

const METADATA_FILE: &str = "metadata.json";

/// Get current UTC timestamp in seconds since UNIX_EPOCH
pub fn get_utc_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}

/// Metadata for a persisted note collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Name of the embedding model used
    pub model_name: String,

    /// Dimension of embeddings
    pub dimension: VectorDimension,

    /// Distance metric used for ranking
    pub metric: DistanceMetric,

    /// Number of notes stored
    pub note_count: usize,

    /// Unix timestamp when created
    pub created_at: u64,

    /// Unix timestamp when last updated
    pub updated_at: u64,

    /// Version of the metadata format
    pub version: u32,
}

impl CollectionMetadata {
    /// Current metadata version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create new metadata with current timestamp
    pub fn new(model_name: String, dimension: VectorDimension, metric: DistanceMetric) -> Self {
        let now = get_utc_timestamp();
        Self {
            model_name,
            dimension,
            metric,
            note_count: 0,
            created_at: now,
            updated_at: now,
            version: Self::CURRENT_VERSION,
        }
    }

    /// Update the metadata with new note count and timestamp
    pub fn update(&mut self, note_count: usize) {
        self.note_count = note_count;
        self.updated_at = get_utc_timestamp();
    }

    /// Check that a collection built with this metadata can be used with
    /// the given model, dimension and metric.
    pub fn ensure_compatible(
        &self,
        model_name: &str,
        dimension: VectorDimension,
        metric: DistanceMetric,
    ) -> StoreResult<()> {
        if self.model_name != model_name || self.dimension != dimension {
            return Err(StoreError::Incompatible {
                expected: format!("model {model_name} ({} dims)", dimension.get()),
                found: format!("model {} ({} dims)", self.model_name, self.dimension.get()),
                suggestion: "Embeddings from different models are not comparable".to_string(),
            });
        }
        if self.metric != metric {
            return Err(StoreError::Incompatible {
                expected: format!("metric {metric}"),
                found: format!("metric {}", self.metric),
                suggestion: "The duplicate threshold depends on the metric".to_string(),
            });
        }
        Ok(())
    }

    /// Save metadata to a JSON file
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let metadata_path = path.join(METADATA_FILE);

        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::Corrupted {
            path: metadata_path.clone(),
            reason: format!("Failed to serialize metadata: {e}"),
            suggestion: "This is likely a bug in the code".to_string(),
        })?;

        crate::vector::write_atomic(&metadata_path, json.as_bytes())
    }

    /// Load metadata from a JSON file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let metadata_path = path.join(METADATA_FILE);

        let json = std::fs::read_to_string(&metadata_path).map_err(|e| StoreError::FileRead {
            path: metadata_path.clone(),
            source: e,
        })?;

        let metadata: Self = serde_json::from_str(&json).map_err(|e| StoreError::Corrupted {
            path: metadata_path.clone(),
            reason: e.to_string(),
            suggestion: "The metadata file may be corrupted. Move the collection aside."
                .to_string(),
        })?;

        // Check version compatibility
        if metadata.version > Self::CURRENT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: metadata.version,
                supported: Self::CURRENT_VERSION,
            });
        }

        Ok(metadata)
    }

    /// Check if metadata file exists
    pub fn exists(path: &Path) -> bool {
        path.join(METADATA_FILE).exists()
    }
}
