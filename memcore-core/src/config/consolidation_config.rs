use serde::{Deserialize, Serialize};

use super::defaults;

/// Consolidation Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Periodic scheduling interval, in seconds. A value of 0 disables
    /// periodic runs (triggered/explicit runs still work).
    pub interval_secs: u64,
    /// Cosine-similarity threshold above which two records in the same
    /// group are considered redundant (phase 2).
    pub redundancy_threshold: f32,
    /// Importance below which an untouched, unpinned record is pruned
    /// (phase 6).
    pub prune_threshold: f64,
    /// Floor applied to a freshly created summary record's importance.
    pub min_summary_importance: f64,
    /// Width, in nanoseconds, of the coarse time buckets used for
    /// grouping (phase 1).
    pub coarse_time_bucket_nanos: i64,
    /// Minimum group size eligible for redundancy detection.
    pub min_group_size: usize,
    /// Eviction-rate threshold above which CMC triggers an out-of-cycle
    /// consolidation run.
    pub eviction_rate_trigger: f64,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::default_interval_secs(),
            redundancy_threshold: defaults::default_redundancy_threshold(),
            prune_threshold: defaults::default_prune_threshold(),
            min_summary_importance: defaults::default_min_summary_importance(),
            coarse_time_bucket_nanos: defaults::default_coarse_time_bucket_nanos(),
            min_group_size: 2,
            eviction_rate_trigger: 0.5,
        }
    }
}
