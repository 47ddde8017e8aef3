//! `CmcStats` — an observability snapshot of the cascading cache:
//! `cascade_operations`, `memories_retained`, `tokens_saved`, and
//! per-tier `utilization`.

/// Per-tier occupancy and lifetime operation counters.
#[derive(Debug, Clone, Default)]
pub struct TierStats {
    pub level: usize,
    pub resident: usize,
    pub current_tokens: u32,
    pub token_capacity: u32,
    pub utilization: f64,
    pub evictions: u64,
    pub promotions: u64,
    pub demotions: u64,
    pub compressions: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CmcStats {
    pub tiers: Vec<TierStats>,
    /// Total admits + evictions + promotions + demotions handled.
    pub cascade_operations: u64,
    /// Records currently resident across all tiers.
    pub memories_retained: usize,
    /// Cumulative tokens saved by compression (original - compressed).
    pub tokens_saved: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct StatsCounters {
    pub cascade_operations: u64,
    pub tokens_saved: u64,
}
