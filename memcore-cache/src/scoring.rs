//! Retention score: eviction ordering within a tier and
//! promotion comparisons across adjacent tiers.

use crate::entry::CacheEntry;
use memcore_core::config::ScoringConfig;

/// `exp(-delta / half_life)`. `half_life_nanos <= 0` decays instantly.
pub fn recency_decay(delta_nanos: i64, half_life_nanos: i64) -> f64 {
    if half_life_nanos <= 0 {
        return 0.0;
    }
    let delta = delta_nanos.max(0) as f64;
    (-delta / half_life_nanos as f64).exp()
}

/// `score = w_i*importance + w_r*recency_decay + w_a*log(1+access_count) - w_c*compression_level`
pub fn retention_score(entry: &CacheEntry, now: i64, half_life_nanos: i64, weights: &ScoringConfig) -> f64 {
    let recency = recency_decay(now - entry.last_access_at, half_life_nanos);
    let usage = (1.0 + entry.access_count as f64).ln();
    weights.w_i * entry.importance + weights.w_r * recency + weights.w_a * usage
        - weights.w_c * entry.compression_level as f64
}
