pub mod concurrency_config;
pub mod consolidation_config;
pub mod defaults;
pub mod episodic_config;
pub mod scoring_config;
pub mod tier_config;

pub use concurrency_config::ConcurrencyConfig;
pub use consolidation_config::ConsolidationConfig;
pub use episodic_config::EpisodicConfig;
pub use scoring_config::ScoringConfig;
pub use tier_config::TierConfig;

use serde::{Deserialize, Serialize};

/// Full configuration surface for a memcore instance.
/// Every field has a default; construct via `MemCoreConfig::default()`
/// and override selectively, or load from TOML via `from_toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemCoreConfig {
    pub tiers: Vec<TierConfig>,
    pub per_record_max_tokens: u32,
    pub epm: EpisodicConfig,
    pub cs: ConsolidationConfig,
    pub scoring: ScoringConfig,
    pub concurrency: ConcurrencyConfig,
    /// Must match the injected `EmbeddingProvider::dimensions()`.
    pub embedding_dim: usize,
}

impl Default for MemCoreConfig {
    fn default() -> Self {
        Self {
            tiers: defaults::default_tiers(),
            per_record_max_tokens: defaults::default_per_record_max_tokens(),
            epm: EpisodicConfig::default(),
            cs: ConsolidationConfig::default(),
            scoring: ScoringConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            embedding_dim: defaults::default_embedding_dim(),
        }
    }
}

impl MemCoreConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate tier configuration: capacities strictly increasing,
    /// importance thresholds strictly decreasing, at least one tier.
    pub fn validate(&self) -> Result<(), String> {
        if self.tiers.is_empty() {
            return Err("at least one CMC tier is required".to_string());
        }
        for window in self.tiers.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if b.token_capacity <= a.token_capacity {
                return Err(format!(
                    "tier capacities must strictly increase: {} then {}",
                    a.token_capacity, b.token_capacity
                ));
            }
            if b.importance_threshold >= a.importance_threshold {
                return Err(format!(
                    "tier importance thresholds must strictly decrease: {} then {}",
                    a.importance_threshold, b.importance_threshold
                ));
            }
        }
        Ok(())
    }

    pub fn token_budget(&self) -> u32 {
        self.tiers.iter().map(|t| t.token_capacity).sum()
    }
}
