//! `CascadingCache` — the Cascading Memory Cache engine.
//!
//! Mutating operations (`admit`, `touch`, eviction) take the exclusive
//! side of an `RwLock`; `select`/`stats` take the shared side.

use std::sync::{Arc, RwLock};

use memcore_core::config::{ScoringConfig, TierConfig};
use memcore_core::errors::{CacheError, MemCoreError, MemCoreResult};
use memcore_core::memory::CacheTier;
use memcore_core::outcome::AdmitOutcome;
use memcore_core::traits::{Clock, EmbeddingProvider, Summarizer, TokenEstimator};
use memcore_store::{MemoryStore, MetadataPatch};
use tracing::{debug, warn};

use crate::compression;
use crate::entry::CacheEntry;
use crate::scoring::retention_score;
use crate::stats::{CmcStats, StatsCounters, TierStats};

struct TierRuntime {
    tier: CacheTier,
    entries: std::collections::HashMap<String, CacheEntry>,
    evictions: u64,
    promotions: u64,
    demotions: u64,
    compressions: u64,
}

impl TierRuntime {
    fn from_config(level: usize, cfg: &TierConfig) -> Self {
        Self {
            tier: CacheTier {
                level,
                token_capacity: cfg.token_capacity,
                importance_threshold: cfg.importance_threshold,
                compression_policy: cfg.compression_policy,
                half_life_nanos: cfg.half_life_nanos,
                members: Vec::new(),
                current_tokens: 0,
            },
            entries: std::collections::HashMap::new(),
            evictions: 0,
            promotions: 0,
            demotions: 0,
            compressions: 0,
        }
    }

    fn insert(&mut self, entry: CacheEntry) {
        self.tier.current_tokens += entry.tokens;
        self.tier.members.push(entry.id.clone());
        self.entries.insert(entry.id.clone(), entry);
    }

    fn remove(&mut self, id: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(id)?;
        self.tier.current_tokens = self.tier.current_tokens.saturating_sub(entry.tokens);
        self.tier.members.retain(|m| m != id);
        Some(entry)
    }

    fn weakest(&self, now: i64, weights: &ScoringConfig, exclude_pinned: bool) -> Option<String> {
        self.entries
            .values()
            .filter(|e| !exclude_pinned || !e.pinned)
            .min_by(|a, b| {
                let sa = retention_score(a, now, self.tier.half_life_nanos, weights);
                let sb = retention_score(b, now, self.tier.half_life_nanos, weights);
                sa.partial_cmp(&sb)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.last_access_at.cmp(&b.last_access_at))
            })
            .map(|e| e.id.clone())
    }
}

struct CmcState {
    tiers: Vec<TierRuntime>,
    counters: StatsCounters,
}

/// The Cascading Memory Cache.
pub struct CascadingCache {
    state: RwLock<CmcState>,
    store: Arc<MemoryStore>,
    estimator: Arc<dyn TokenEstimator>,
    embeddings: Arc<dyn EmbeddingProvider>,
    summarizer: Arc<dyn Summarizer>,
    clock: Arc<dyn Clock>,
    weights: ScoringConfig,
}

impl CascadingCache {
    pub fn new(
        tiers: &[TierConfig],
        store: Arc<MemoryStore>,
        estimator: Arc<dyn TokenEstimator>,
        embeddings: Arc<dyn EmbeddingProvider>,
        summarizer: Arc<dyn Summarizer>,
        clock: Arc<dyn Clock>,
        weights: ScoringConfig,
    ) -> Self {
        let runtimes = tiers
            .iter()
            .enumerate()
            .map(|(i, cfg)| TierRuntime::from_config(i, cfg))
            .collect();
        Self {
            state: RwLock::new(CmcState {
                tiers: runtimes,
                counters: StatsCounters::default(),
            }),
            store,
            estimator,
            embeddings,
            summarizer,
            clock,
            weights,
        }
    }

    fn tier_count(&self, state: &CmcState) -> usize {
        state.tiers.len()
    }

    /// Choose the lowest-indexed tier whose threshold the record clears.
    fn target_tier(&self, state: &CmcState, importance: f64) -> Option<usize> {
        state
            .tiers
            .iter()
            .position(|t| importance >= t.tier.importance_threshold)
    }

    pub fn admit(&self, record_id: &str, importance: f64, tokens: u32) -> MemCoreResult<AdmitOutcome> {
        let now = self.clock.now();
        let mut state = self.state.write().expect("cmc lock poisoned");

        let Some(mut target) = self.target_tier(&state, importance) else {
            let coldest = state
                .tiers
                .last()
                .map(|t| t.tier.importance_threshold)
                .unwrap_or(0.0);
            debug!(record_id, importance, coldest, "admission rejected: below coldest threshold");
            return Ok(AdmitOutcome::Rejected);
        };

        let mut evicted_all = Vec::new();
        let last_tier = self.tier_count(&state) - 1;
        loop {
            if state.tiers[target].tier.has_room(tokens) {
                let entry = CacheEntry::new(record_id.to_string(), importance, tokens, now);
                state.tiers[target].insert(entry);
                break;
            }
            let evicted = self.evict_from_tier(&mut state, target, tokens, now)?;
            evicted_all.extend(evicted);
            if state.tiers[target].tier.has_room(tokens) {
                let entry = CacheEntry::new(record_id.to_string(), importance, tokens, now);
                state.tiers[target].insert(entry);
                break;
            }
            if target < last_tier {
                target += 1;
                continue;
            }
            warn!(record_id, tokens, "record exceeds coldest tier capacity even after full eviction; admitting anyway");
            let entry = CacheEntry::new(record_id.to_string(), importance, tokens, now);
            state.tiers[target].insert(entry);
            break;
        }

        state.counters.cascade_operations += 1;
        Ok(AdmitOutcome::Admitted {
            tier: target,
            evicted: evicted_all,
        })
    }

    /// Evict the lowest-scoring (non-pinned-at-coldest-tier) members of
    /// `tier` until `tokens_needed` bytes of headroom exist or the tier
    /// cannot shed any more. Returns the ids evicted from `tier` itself.
    fn evict_from_tier(
        &self,
        state: &mut CmcState,
        tier: usize,
        tokens_needed: u32,
        now: i64,
    ) -> MemCoreResult<Vec<String>> {
        let mut evicted = Vec::new();
        let last_tier = self.tier_count(state) - 1;
        loop {
            if state.tiers[tier].tier.free_tokens() >= tokens_needed {
                break;
            }
            let exclude_pinned = tier == last_tier;
            let Some(victim_id) = state.tiers[tier].weakest(now, &self.weights, exclude_pinned) else {
                break;
            };
            let Some(mut victim) = state.tiers[tier].remove(&victim_id) else {
                break;
            };
            state.tiers[tier].evictions += 1;
            evicted.push(victim_id.clone());

            if tier < last_tier {
                let next_threshold = state.tiers[tier + 1].tier.importance_threshold;
                if victim.importance >= next_threshold {
                    self.demote_into(state, tier + 1, &mut victim, now)?;
                } else {
                    // Below the next tier's threshold: leaves CMC entirely
                    // but remains in the Memory Store untouched.
                    debug!(id = %victim_id, "evicted below next-tier threshold, dropped from CMC");
                }
            } else {
                debug!(id = %victim_id, "evicted from coldest tier, dropped from CMC");
            }
        }
        Ok(evicted)
    }

    /// Apply `tier`'s compression policy (if stricter than the entry's
    /// current level) and place the entry there, recursively evicting if
    /// the tier lacks room.
    fn demote_into(
        &self,
        state: &mut CmcState,
        tier: usize,
        entry: &mut CacheEntry,
        now: i64,
    ) -> MemCoreResult<()> {
        let policy = state.tiers[tier].tier.compression_policy;
        let required = policy.required_level();
        if required > entry.compression_level {
            if let Some(record) = self.store.get(&entry.id) {
                let current_content = entry
                    .compressed_content
                    .clone()
                    .unwrap_or_else(|| record.content.clone());
                let result = compression::compress_toward(
                    policy,
                    entry.compression_level,
                    &current_content,
                    &record,
                    self.summarizer.as_ref(),
                    self.estimator.as_ref(),
                );
                if result.level > entry.compression_level {
                    let saved = entry.tokens.saturating_sub(result.tokens);
                    state.counters.tokens_saved += saved as u64;
                    state.tiers[tier].compressions += 1;
                }
                entry.tokens = result.tokens;
                entry.compression_level = result.level;
                entry.compressed_content = Some(result.content);

                if let Err(e) = self.store.update_metadata(
                    &entry.id,
                    MetadataPatch {
                        compression_level: Some(entry.compression_level),
                        ..Default::default()
                    },
                ) {
                    warn!(id = %entry.id, error = %e, "metadata update rejected, rolling back compression state");
                    return Err(MemCoreError::Cache(CacheError::RolledBack {
                        id: entry.id.clone(),
                        reason: e.to_string(),
                    }));
                }
            }
        }

        if !state.tiers[tier].tier.has_room(entry.tokens) {
            let evicted_here = self.evict_from_tier(state, tier, entry.tokens, now)?;
            for id in evicted_here {
                debug!(id, displaced_by = %entry.id, "cascaded eviction while demoting");
            }
        }
        state.tiers[tier].insert(entry.clone());
        state.tiers[tier].demotions += 1;
        Ok(())
    }

    /// Record an access; promotes one tier if the record now outscores
    /// the weakest member of the next-hotter tier.
    pub fn touch(&self, record_id: &str) -> MemCoreResult<()> {
        let now = self.clock.now();
        let mut state = self.state.write().expect("cmc lock poisoned");

        let Some(current_tier) = state.tiers.iter().position(|t| t.entries.contains_key(record_id)) else {
            return Ok(());
        };

        {
            let entry = state.tiers[current_tier]
                .entries
                .get_mut(record_id)
                .expect("position found above");
            entry.access_count += 1;
            entry.last_access_at = now;
        }

        if current_tier == 0 {
            return Ok(());
        }

        let hotter = current_tier - 1;
        let my_score = {
            let entry = &state.tiers[current_tier].entries[record_id];
            retention_score(entry, now, state.tiers[hotter].tier.half_life_nanos, &self.weights)
        };
        let Some(weakest_id) = state.tiers[hotter].weakest(now, &self.weights, false) else {
            // Hotter tier is empty: promote unconditionally.
            let entry = state.tiers[current_tier].remove(record_id).expect("present");
            state.tiers[hotter].insert(entry);
            state.tiers[hotter].promotions += 1;
            return Ok(());
        };
        let weakest_score = {
            let entry = &state.tiers[hotter].entries[&weakest_id];
            retention_score(entry, now, state.tiers[hotter].tier.half_life_nanos, &self.weights)
        };

        if my_score > weakest_score {
            let promoted = state.tiers[current_tier].remove(record_id).expect("present");
            let displaced = state.tiers[hotter].remove(&weakest_id).expect("present");
            state.tiers[hotter].insert(promoted);
            state.tiers[hotter].promotions += 1;

            if !state.tiers[current_tier].tier.has_room(displaced.tokens) {
                self.evict_from_tier(&mut state, current_tier, displaced.tokens, now)?;
            }
            state.tiers[current_tier].insert(displaced);
            state.tiers[current_tier].demotions += 1;
        }

        Ok(())
    }

    /// Mark/unmark a record as pinned by the Episodic Memory Manager.
    /// A no-op if the record is not resident.
    pub fn set_pinned(&self, record_id: &str, pinned: bool) {
        let mut state = self.state.write().expect("cmc lock poisoned");
        for tier in &mut state.tiers {
            if let Some(entry) = tier.entries.get_mut(record_id) {
                entry.pinned = pinned;
                return;
            }
        }
    }

    pub fn is_resident(&self, record_id: &str) -> bool {
        let state = self.state.read().expect("cmc lock poisoned");
        state.tiers.iter().any(|t| t.entries.contains_key(record_id))
    }

    /// Whether `record_id` is currently pinned by an episode.
    /// False for non-resident records.
    pub fn is_pinned(&self, record_id: &str) -> bool {
        let state = self.state.read().expect("cmc lock poisoned");
        state
            .tiers
            .iter()
            .find_map(|t| t.entries.get(record_id))
            .map(|e| e.pinned)
            .unwrap_or(false)
    }

    /// Drop a record from CMC bookkeeping entirely, wherever it is
    /// resident. Used by the Consolidation Service when archiving or
    /// pruning — the Memory Store entry is
    /// untouched by this call. Returns whether it was resident.
    pub fn remove(&self, record_id: &str) -> bool {
        let mut state = self.state.write().expect("cmc lock poisoned");
        for tier in &mut state.tiers {
            if tier.remove(record_id).is_some() {
                return true;
            }
        }
        false
    }

    /// Ordered, read-only selection of resident records within `budget`
    /// tokens. `query_embedding`/`query_tokens` are accepted
    /// for interface symmetry with the Context Builder but do not affect
    /// ordering — the retention score has no query-dependent term.
    pub fn select(&self, _query_embedding: Option<&[f32]>, _query_tokens: u32, budget: u32) -> Vec<String> {
        let now = self.clock.now();
        let state = self.state.read().expect("cmc lock poisoned");

        let mut scored: Vec<(String, f64, u32)> = Vec::new();
        for tier in &state.tiers {
            for entry in tier.entries.values() {
                let score = retention_score(entry, now, tier.tier.half_life_nanos, &self.weights);
                scored.push((entry.id.clone(), score, entry.tokens));
            }
        }
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut out = Vec::new();
        let mut used = 0u32;
        for (id, _score, tokens) in scored {
            if used + tokens > budget {
                continue;
            }
            used += tokens;
            out.push(id);
        }
        out
    }

    /// The cached representation for `id`, if resident (may be a
    /// compressed form); falls back to the Memory Store's original
    /// content when not resident or not yet compressed.
    pub fn content_for(&self, id: &str) -> Option<Vec<u8>> {
        {
            let state = self.state.read().expect("cmc lock poisoned");
            for tier in &state.tiers {
                if let Some(entry) = tier.entries.get(id) {
                    if let Some(ref compressed) = entry.compressed_content {
                        return Some(compressed.clone());
                    }
                    break;
                }
            }
        }
        self.store.get(id).map(|r| r.content)
    }

    pub fn stats(&self) -> CmcStats {
        let state = self.state.read().expect("cmc lock poisoned");
        let tiers: Vec<TierStats> = state
            .tiers
            .iter()
            .map(|t| TierStats {
                level: t.tier.level,
                resident: t.entries.len(),
                current_tokens: t.tier.current_tokens,
                token_capacity: t.tier.token_capacity,
                utilization: if t.tier.token_capacity == 0 {
                    0.0
                } else {
                    t.tier.current_tokens as f64 / t.tier.token_capacity as f64
                },
                evictions: t.evictions,
                promotions: t.promotions,
                demotions: t.demotions,
                compressions: t.compressions,
            })
            .collect();
        let memories_retained = tiers.iter().map(|t| t.resident).sum();
        CmcStats {
            tiers,
            cascade_operations: state.counters.cascade_operations,
            memories_retained,
            tokens_saved: state.counters.tokens_saved,
        }
    }

    /// The embedding provider injected at construction, exposed for the
    /// Context Builder's `query_embedding` step.
    pub fn embeddings(&self) -> &dyn EmbeddingProvider {
        self.embeddings.as_ref()
    }
}
