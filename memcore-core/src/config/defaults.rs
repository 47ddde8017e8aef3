use crate::constants;

pub fn default_per_record_max_tokens() -> u32 {
    constants::DEFAULT_PER_RECORD_MAX_TOKENS
}

pub fn default_tiers() -> Vec<super::TierConfig> {
    vec![
        super::TierConfig {
            token_capacity: 4_000,
            importance_threshold: 0.7,
            compression_policy: crate::memory::CompressionPolicy::None,
            half_life_nanos: 3_600_000_000_000, // 1 hour
        },
        super::TierConfig {
            token_capacity: 16_000,
            importance_threshold: 0.4,
            compression_policy: crate::memory::CompressionPolicy::Lossless,
            half_life_nanos: 86_400_000_000_000, // 1 day
        },
        super::TierConfig {
            token_capacity: 64_000,
            importance_threshold: 0.1,
            compression_policy: crate::memory::CompressionPolicy::Semantic,
            half_life_nanos: 604_800_000_000_000, // 1 week
        },
    ]
}

pub fn default_surprise_threshold_bootstrap() -> f64 {
    constants::DEFAULT_SURPRISE_THRESHOLD_BOOTSTRAP
}

pub fn default_adaptive_quantile() -> f64 {
    constants::DEFAULT_ADAPTIVE_QUANTILE
}

pub fn default_max_members() -> usize {
    constants::DEFAULT_MAX_EPISODE_MEMBERS
}

pub fn default_max_episode_span_nanos() -> i64 {
    constants::DEFAULT_MAX_EPISODE_SPAN_NANOS
}

pub fn default_pin_count() -> usize {
    constants::DEFAULT_PIN_COUNT
}

pub fn default_summarize_threshold() -> u32 {
    constants::DEFAULT_SUMMARIZE_THRESHOLD_TOKENS
}

pub fn default_interval_secs() -> u64 {
    300
}

pub fn default_redundancy_threshold() -> f32 {
    constants::DEFAULT_REDUNDANCY_THRESHOLD
}

pub fn default_prune_threshold() -> f64 {
    constants::DEFAULT_PRUNE_THRESHOLD
}

pub fn default_min_summary_importance() -> f64 {
    constants::DEFAULT_MIN_SUMMARY_IMPORTANCE
}

pub fn default_coarse_time_bucket_nanos() -> i64 {
    86_400_000_000_000 // 1 day
}

pub fn default_w_i() -> f64 {
    0.5
}
pub fn default_w_r() -> f64 {
    0.3
}
pub fn default_w_a() -> f64 {
    0.2
}
pub fn default_w_c() -> f64 {
    constants::DEFAULT_COMPRESSION_PENALTY
}
pub fn default_lambda_query() -> f64 {
    0.5
}

pub fn default_ingest_queue_capacity() -> usize {
    1_024
}

pub fn default_embedding_dim() -> usize {
    384
}
