//! Embedding generation for note content.
//!
//! This module provides the trait and the fastembed-backed implementation
//! used to turn note text into vectors. The default model is
//! BAAI/bge-small-en-v1.5, which produces 384-dimensional, unit-length
//! embeddings.

use crate::vector::{VectorDimension, VectorError};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

/// Model names accepted in `[embedding] model`.
pub const SUPPORTED_MODELS: &[&str] = &[
    "BAAI/bge-small-en-v1.5",
    "BAAI/bge-base-en-v1.5",
    "sentence-transformers/all-MiniLM-L6-v2",
    "sentence-transformers/all-MiniLM-L12-v2",
    "intfloat/multilingual-e5-small",
];

/// Trait for generating embeddings from text.
///
/// Implementations of this trait should be thread-safe and
/// capable of handling batch processing efficiently.
pub trait EmbeddingGenerator: Send + Sync {
    /// Generate embeddings for multiple texts.
    ///
    /// # Arguments
    /// * `texts` - Slice of text strings to generate embeddings for
    ///
    /// # Returns
    /// A vector of embeddings, one for each input text, or an error
    fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError>;

    /// Get the dimension of embeddings produced by this generator.
    #[must_use]
    fn dimension(&self) -> VectorDimension;

    /// Canonical name of the model, recorded in collection metadata.
    #[must_use]
    fn model_name(&self) -> &str;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        self.generate_embeddings(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::EmbeddingFailed("model returned no embedding".to_string()))
    }
}

/// Parse a configured model name into a fastembed model.
///
/// Accepts both the Hugging Face code and the fastembed variant name.
pub fn parse_embedding_model(name: &str) -> Result<EmbeddingModel, VectorError> {
    match name {
        "BAAI/bge-small-en-v1.5" | "BGESmallENV15" => Ok(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" | "BGEBaseENV15" => Ok(EmbeddingModel::BGEBaseENV15),
        "sentence-transformers/all-MiniLM-L6-v2" | "AllMiniLML6V2" => {
            Ok(EmbeddingModel::AllMiniLML6V2)
        }
        "sentence-transformers/all-MiniLM-L12-v2" | "AllMiniLML12V2" => {
            Ok(EmbeddingModel::AllMiniLML12V2)
        }
        "intfloat/multilingual-e5-small" | "MultilingualE5Small" => {
            Ok(EmbeddingModel::MultilingualE5Small)
        }
        other => Err(VectorError::UnknownModel(other.to_string())),
    }
}

/// Canonical name for a supported model.
#[must_use]
pub fn model_to_string(model: &EmbeddingModel) -> &'static str {
    match model {
        EmbeddingModel::BGESmallENV15 => "BAAI/bge-small-en-v1.5",
        EmbeddingModel::BGEBaseENV15 => "BAAI/bge-base-en-v1.5",
        EmbeddingModel::AllMiniLML6V2 => "sentence-transformers/all-MiniLM-L6-v2",
        EmbeddingModel::AllMiniLML12V2 => "sentence-transformers/all-MiniLM-L12-v2",
        EmbeddingModel::MultilingualE5Small => "intfloat/multilingual-e5-small",
        _ => "unknown",
    }
}

/// FastEmbed implementation of the embedding provider.
///
/// The model is loaded once and shared for the lifetime of the process.
pub struct FastEmbedGenerator {
    model: Mutex<TextEmbedding>,
    model_name: &'static str,
    dimension: VectorDimension,
}

impl std::fmt::Debug for FastEmbedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedGenerator")
            .field("model", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl FastEmbedGenerator {
    /// Load the named model, downloading it into `cache_dir` on first use.
    ///
    /// # Errors
    /// Returns an error if the name is unknown or the model fails to
    /// initialize or download.
    pub fn new(
        model_name: &str,
        cache_dir: PathBuf,
        show_download_progress: bool,
    ) -> Result<Self, VectorError> {
        let model = parse_embedding_model(model_name)?;

        // Check if models directory has any content (indicating cached models)
        let has_cached_models = cache_dir.exists()
            && cache_dir
                .read_dir()
                .is_ok_and(|mut entries| entries.any(|_| true));

        if has_cached_models {
            info!("Loading embedding model {model_name} from cache");
        } else {
            info!("Downloading embedding model {model_name} (first time only)");
        }

        let canonical = model_to_string(&model);
        let mut text_model = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(show_download_progress),
        )
        .map_err(|e| VectorError::ModelInit(e.to_string()))?;

        // Get dimensions by generating a test embedding
        let probe = text_model
            .embed(vec!["dimension probe"], None)
            .map_err(|e| VectorError::EmbeddingFailed(e.to_string()))?;
        let dimension = probe
            .into_iter()
            .next()
            .map(|v| v.len())
            .ok_or_else(|| VectorError::EmbeddingFailed("model returned no embedding".to_string()))
            .and_then(VectorDimension::new)?;

        debug!("Embedding model {canonical} ready ({} dimensions)", dimension.get());

        Ok(Self {
            model: Mutex::new(text_model),
            model_name: canonical,
            dimension,
        })
    }
}

impl EmbeddingGenerator for FastEmbedGenerator {
    fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let text_strings: Vec<String> = texts.iter().map(|&s| s.to_string()).collect();

        let embeddings = self
            .model
            .lock()
            .map_err(|_| {
                VectorError::EmbeddingFailed(
                    "Failed to acquire embedding model lock - model may be poisoned".to_string(),
                )
            })?
            .embed(text_strings, None)
            .map_err(|e| {
                VectorError::EmbeddingFailed(format!("Failed to generate embeddings: {e}"))
            })?;

        for embedding in &embeddings {
            self.dimension.validate_vector(embedding)?;
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn model_name(&self) -> &str {
        self.model_name
    }
}

/// Mock embedding generator for testing.
///
/// Each keyword group owns one axis; text lights up the axes of the
/// groups it mentions and the result is normalized, so texts sharing no
/// keywords are orthogonal and identical texts are at distance zero.
#[cfg(test)]
pub struct MockEmbeddingGenerator {
    dimension: VectorDimension,
}

#[cfg(test)]
impl Default for MockEmbeddingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl MockEmbeddingGenerator {
    const GROUPS: &'static [&'static [&'static str]] = &[
        &["milk", "groceries", "grocery", "bread", "eggs", "buy", "shopping"],
        &["quantum", "qubit", "computing", "physics"],
        &["meeting", "standup", "calendar", "schedule"],
        &["rust", "cargo", "borrow", "compiler"],
        &["gym", "run", "workout", "exercise"],
    ];

    #[must_use]
    pub fn new() -> Self {
        Self {
            dimension: VectorDimension::new(8).unwrap(),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let dim = self.dimension.get();
        let mut embedding = vec![0.0; dim];
        let lowered = text.to_lowercase();

        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            if let Some(group) = Self::GROUPS.iter().position(|g| g.contains(&word)) {
                embedding[group] += 1.0;
            }
        }

        // Unknown text lands on the last axis
        if embedding.iter().all(|v| *v == 0.0) {
            embedding[dim - 1] = 1.0;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        for val in &mut embedding {
            *val /= magnitude;
        }
        embedding
    }
}

#[cfg(test)]
impl EmbeddingGenerator for MockEmbeddingGenerator {
    fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, VectorError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-keywords"
    }
}
