//! Configuration module for the notes server.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.fastnotes/settings.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `FN_` and use double underscores
//! to separate nested levels:
//! - `FN_NOTES__DUPLICATE_THRESHOLD=0.2` sets `notes.duplicate_threshold`
//! - `FN_STORE__PATH=/data/notes` sets `store.path`
//! - `FN_LOGGING__LEVEL=debug` sets `logging.level`

use crate::vector::DistanceMetric;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".fastnotes";
const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .fastnotes is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Where notes are persisted
    #[serde(default)]
    pub store: StoreConfig,

    /// Embedding model settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Duplicate policy and search settings
    #[serde(default)]
    pub notes: NotesConfig,

    /// Server settings (stdio/http mode)
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    /// Directory holding all collections
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Collection name inside `path`
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Distance metric; fixed once the collection exists
    #[serde(default)]
    pub metric: DistanceMetric,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmbeddingConfig {
    /// Model to use for embeddings
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Model download cache, defaults to ~/.fastnotes/models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Print a progress bar while the model downloads
    #[serde(default = "default_false")]
    pub show_download_progress: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotesConfig {
    /// A save is refused when the nearest note is closer than this
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f32,

    /// Maximum number of notes returned by a search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Serialize concurrent saves of identical content
    #[serde(default = "default_true")]
    pub serialize_saves: bool,
}

impl NotesConfig {
    /// Check the duplicate threshold and search limit.
    pub fn validate(&self) -> Result<(), String> {
        if !self.duplicate_threshold.is_finite() || self.duplicate_threshold < 0.0 {
            return Err(format!(
                "notes.duplicate_threshold must be a finite number >= 0, got {}",
                self.duplicate_threshold
            ));
        }
        if self.search_limit == 0 {
            return Err("notes.search_limit must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Default server mode: "stdio" or "http"
    #[serde(default = "default_server_mode")]
    pub mode: String,

    /// HTTP server bind address
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_store_path() -> PathBuf {
    PathBuf::from("./fast_notes_db")
}
fn default_collection() -> String {
    "private_knowledge".to_string()
}
fn default_embedding_model() -> String {
    "BAAI/bge-small-en-v1.5".to_string()
}
fn default_duplicate_threshold() -> f32 {
    0.35
}
fn default_search_limit() -> usize {
    3
}
fn default_server_mode() -> String {
    "stdio".to_string()
}
fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            store: StoreConfig::default(),
            embedding: EmbeddingConfig::default(),
            notes: NotesConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            collection: default_collection(),
            metric: DistanceMetric::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            cache_dir: None,
            show_download_progress: false,
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: default_duplicate_threshold(),
            search_limit: default_search_limit(),
            serialize_saves: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: default_server_mode(),
            bind: default_bind_address(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn env_provider() -> Env {
    // Double underscore separates nested levels, single underscores stay
    Env::prefixed("FN_").map(|key| key.as_str().to_lowercase().replace("__", ".").into())
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
            .and_then(Self::validated)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
            .and_then(Self::validated)
    }

    /// Reject values that deserialize but cannot work.
    fn validated(settings: Self) -> Result<Self, Box<figment::Error>> {
        settings.notes.validate().map_err(|e| Box::new(figment::Error::from(e)))?;
        Ok(settings)
    }

    /// Find the workspace config by looking for a .fastnotes directory
    /// from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .fastnotes is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Cannot read configuration file: {e}"))?;
        toml::from_str::<Settings>(&content).map_err(|e| {
            format!(
                "Configuration file is corrupted: {e}\nRun 'fastnotes init --force' to regenerate."
            )
        })?;

        Ok(())
    }

    /// Directory for downloaded embedding models
    pub fn embedding_cache_dir(&self) -> PathBuf {
        self.embedding
            .cache_dir
            .clone()
            .unwrap_or_else(crate::init::models_dir)
    }

    /// Effective log level, raised to debug by the global flag
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.logging.level
        }
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Self::init_config_file_in(Path::new("."), force)
    }

    /// Create a default settings file under `root/.fastnotes/`
    pub fn init_config_file_in(
        root: &Path,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, SETTINGS_TEMPLATE)?;
        Ok(config_path)
    }
}

const SETTINGS_TEMPLATE: &str = r#"# fastnotes configuration file

# Version of the configuration schema
version = 1

# Global debug mode (forces debug logging)
debug = false

[store]
# Directory holding the note collections (relative to where the server starts)
path = "./fast_notes_db"

# Collection name inside the store directory
collection = "private_knowledge"

# Distance metric: "l2" (squared euclidean), "cosine" or "ip"
# Fixed when the collection is created; notes.duplicate_threshold is in its units
metric = "l2"

[embedding]
# Embedding model. Supported:
#   BAAI/bge-small-en-v1.5 (default, 384 dims)
#   BAAI/bge-base-en-v1.5
#   sentence-transformers/all-MiniLM-L6-v2
#   sentence-transformers/all-MiniLM-L12-v2
#   intfloat/multilingual-e5-small
model = "BAAI/bge-small-en-v1.5"

# Model download cache (default: ~/.fastnotes/models)
# cache_dir = "/path/to/models"

# Show a progress bar while the model downloads on first run
show_download_progress = false

[notes]
# A new note is refused when an existing note is closer than this distance
duplicate_threshold = 0.35

# Maximum number of notes returned by search_notes
search_limit = 3

# Serialize concurrent saves of identical content
serialize_saves = true

[server]
# Server mode: "stdio" (default) or "http"
mode = "stdio"

# HTTP server bind address (only used when mode = "http" or --http flag)
bind = "127.0.0.1:8080"

[logging]
# trace, debug, info, warn or error. Logs go to stderr.
level = "info"
"#;
