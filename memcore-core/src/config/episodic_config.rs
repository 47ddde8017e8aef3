use serde::{Deserialize, Serialize};

use super::defaults;

/// Episodic Memory Manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodicConfig {
    /// Bootstrap surprise threshold before the adaptive quantile has
    /// enough samples.
    pub surprise_threshold_bootstrap: f64,
    /// Running quantile tracked over non-boundary surprise values
    /// (e.g. 0.8 for the 80th percentile).
    pub adaptive_quantile: f64,
    /// Force-close an episode once it reaches this many members.
    pub max_members: usize,
    /// Force-close an episode once it spans this many nanoseconds.
    pub max_episode_span_nanos: i64,
    /// Number of most-recently-closed episodes whose members stay pinned.
    pub pin_count: usize,
    /// Minimum `size_tokens` for a closed episode to request summarization.
    pub summarize_threshold: u32,
    /// Minimum number of surprise samples before the adaptive quantile
    /// replaces the bootstrap threshold.
    pub quantile_warmup_samples: usize,
}

impl Default for EpisodicConfig {
    fn default() -> Self {
        Self {
            surprise_threshold_bootstrap: defaults::default_surprise_threshold_bootstrap(),
            adaptive_quantile: defaults::default_adaptive_quantile(),
            max_members: defaults::default_max_members(),
            max_episode_span_nanos: defaults::default_max_episode_span_nanos(),
            pin_count: defaults::default_pin_count(),
            summarize_threshold: defaults::default_summarize_threshold(),
            quantile_warmup_samples: 20,
        }
    }
}
