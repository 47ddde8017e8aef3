//! Result types for `MemoryCore`'s public operations.

use memcore_cache::CmcStats;

/// Result of `put`.
#[derive(Debug, Clone)]
pub struct PutResult {
    pub id: String,
}

/// One hit from `search`.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub similarity: f32,
}

/// Episodic Memory Manager portion of `stats()`.
#[derive(Debug, Clone, Default)]
pub struct EpmStats {
    pub episode_count: usize,
    pub pinned_count: usize,
    pub pending_consolidation_count: usize,
}

/// Consolidation Service portion of `stats()`.
#[derive(Debug, Clone, Default)]
pub struct CsStats {
    pub running: bool,
}

/// Aggregate observability snapshot across all four engines.
#[derive(Debug, Clone, Default)]
pub struct MemoryCoreStats {
    pub store_records: usize,
    pub cmc: CmcStats,
    pub epm: EpmStats,
    pub cs: CsStats,
}
