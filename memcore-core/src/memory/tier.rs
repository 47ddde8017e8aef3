use serde::{Deserialize, Serialize};

/// Compression policy applied to records demoted into a tier.
/// Monotonic: a record at `Semantic` never returns to `None` on re-promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionPolicy {
    None,
    Lossless,
    Semantic,
}

impl CompressionPolicy {
    /// The `compression_level` a record must reach to satisfy this policy.
    pub fn required_level(self) -> u32 {
        match self {
            CompressionPolicy::None => 0,
            CompressionPolicy::Lossless => 1,
            CompressionPolicy::Semantic => 2,
        }
    }
}

/// One tier of the Cascading Memory Cache. `level` 0 is hottest.
/// `members` tracks only ids and current token footprint; the records
/// themselves live in the Memory Store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTier {
    pub level: usize,
    pub token_capacity: u32,
    pub importance_threshold: f64,
    pub compression_policy: CompressionPolicy,
    /// Half-life (nanoseconds) used by the tier's recency-decay term.
    pub half_life_nanos: i64,
    /// Ordered by insertion/promotion recency; eviction order is computed
    /// from the retention score, not from this ordering.
    pub members: Vec<String>,
    pub current_tokens: u32,
}

impl CacheTier {
    pub fn has_room(&self, tokens: u32) -> bool {
        self.current_tokens + tokens <= self.token_capacity
    }

    pub fn free_tokens(&self) -> u32 {
        self.token_capacity.saturating_sub(self.current_tokens)
    }
}
