use serde::{Deserialize, Serialize};

use crate::memory::CompressionPolicy;

/// One configured CMC tier. `CacheTier` (the runtime
/// state) is built from this plus an empty member list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    pub token_capacity: u32,
    pub importance_threshold: f64,
    pub compression_policy: CompressionPolicy,
    pub half_life_nanos: i64,
}
