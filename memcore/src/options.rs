//! Construction-time options for `MemoryCore`.

use std::path::PathBuf;
use std::sync::Arc;

use memcore_core::config::MemCoreConfig;
use memcore_core::traits::{Clock, EmbeddingProvider, SimilarityIndex, Summarizer, SynthesizeMerge, TokenEstimator};

/// Options accepted by `MemoryCore::new`/`MemoryCore::restore`. Every
/// capability is optional and falls back to a concrete, dependency-light
/// default: no field here reaches for process-wide state.
pub struct MemoryCoreOptions {
    /// SQLite path. `None` opens an in-memory store.
    pub db_path: Option<PathBuf>,
    pub config: MemCoreConfig,
    pub estimator: Option<Arc<dyn TokenEstimator>>,
    pub embeddings: Option<Arc<dyn EmbeddingProvider>>,
    pub similarity: Option<Arc<dyn SimilarityIndex>>,
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub synthesizer: Option<Arc<dyn SynthesizeMerge>>,
    pub clock: Option<Arc<dyn Clock>>,
}

impl Default for MemoryCoreOptions {
    fn default() -> Self {
        Self {
            db_path: None,
            config: MemCoreConfig::default(),
            estimator: None,
            embeddings: None,
            similarity: None,
            summarizer: None,
            synthesizer: None,
            clock: None,
        }
    }
}

impl MemoryCoreOptions {
    pub fn with_config(config: MemCoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }
}
