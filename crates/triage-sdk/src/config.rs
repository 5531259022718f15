//! Configuration types for TriageEngine

use crate::catalog::{DEFAULT_CHILD_TREE, DEFAULT_YOUNG_INFANT_TREE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where sessions are kept between answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process memory; lost on restart
    Memory,
    /// One JSON document per subject
    FileSystem {
        #[serde(default = "default_session_path")]
        path: PathBuf,
    },
}

fn default_session_path() -> PathBuf {
    PathBuf::from("sessions")
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory
    }
}

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directories scanned recursively for tree documents
    pub tree_dirs: Vec<PathBuf>,

    /// Individual tree documents
    pub tree_files: Vec<PathBuf>,

    /// Tree contents (source name, content) - alternative to file paths
    #[serde(skip)]
    pub tree_contents: Vec<(String, String)>,

    /// Register the built-in IMCI catalogue
    pub include_builtin_catalog: bool,

    /// Tree used for subjects under 2 months when none is requested
    pub young_infant_tree: String,

    /// Tree used for subjects from 2 months when none is requested
    pub child_tree: String,

    pub session_store: StoreConfig,

    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Default filter for `logging::init_tracing`
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            tree_dirs: Vec::new(),
            tree_files: Vec::new(),
            tree_contents: Vec::new(),
            include_builtin_catalog: true,
            young_infant_tree: DEFAULT_YOUNG_INFANT_TREE.to_string(),
            child_tree: DEFAULT_CHILD_TREE.to_string(),
            session_store: StoreConfig::default(),
            enable_metrics: true,
            log_level: "info".to_string(),
        }
    }

    /// Load configuration from `config/triage.*` and `TRIAGE_*` environment
    /// variables, after reading `.env` if present
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/triage").required(false))
            .add_source(config::Environment::with_prefix("TRIAGE"))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(e) => {
                tracing::info!("No usable config source ({}), using default configuration", e);
                Ok(Self::default())
            }
        }
    }

    /// Add a directory of tree documents
    pub fn with_tree_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.tree_dirs.push(path.into());
        self
    }

    /// Add a tree document
    pub fn with_tree_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tree_files.push(path.into());
        self
    }

    /// Add tree document content
    pub fn with_tree_content(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.tree_contents.push((name.into(), content.into()));
        self
    }

    pub fn include_builtin_catalog(mut self, include: bool) -> Self {
        self.include_builtin_catalog = include;
        self
    }

    pub fn with_young_infant_tree(mut self, tree_id: impl Into<String>) -> Self {
        self.young_infant_tree = tree_id.into();
        self
    }

    pub fn with_child_tree(mut self, tree_id: impl Into<String>) -> Self {
        self.child_tree = tree_id.into();
        self
    }

    pub fn with_session_store(mut self, store: StoreConfig) -> Self {
        self.session_store = store;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
