//! `ContextBuilder`: composes the Episodic Memory Manager and Cascading
//! Memory Cache into a single token-budgeted working context.
//! Shape is query -> per-source fan-out -> fuse -> budget-pack, with
//! the two sources being EPM's episodic context and CMC's tiered
//! selection rather than a hybrid text/vector search.

use std::collections::HashSet;
use std::sync::Arc;

use memcore_cache::CascadingCache;
use memcore_core::config::ScoringConfig;
use memcore_core::errors::{ContextError, MemCoreResult};
use memcore_core::traits::TokenEstimator;
use memcore_episodic::EpisodicManager;
use memcore_store::MemoryStore;
use tracing::debug;

use crate::header;
use crate::working_context::WorkingContext;

pub struct ContextBuilder {
    store: Arc<MemoryStore>,
    cache: Arc<CascadingCache>,
    episodic: Arc<EpisodicManager>,
    estimator: Arc<dyn TokenEstimator>,
    scoring: ScoringConfig,
}

impl ContextBuilder {
    pub fn new(
        store: Arc<MemoryStore>,
        cache: Arc<CascadingCache>,
        episodic: Arc<EpisodicManager>,
        estimator: Arc<dyn TokenEstimator>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            store,
            cache,
            episodic,
            estimator,
            scoring,
        }
    }

    /// `build_context(query, budget) → WorkingContext`.
    pub fn build_context(&self, query: &[u8], budget: u32) -> MemCoreResult<WorkingContext> {
        let query_embedding = self.cache.embeddings().embed(query);
        let query_tokens = self.estimator.estimate(query);

        // Step 2/3: split the budget between EPM's episodic context and
        // CMC's tiered selection per the scoring lambda, which doubles as
        // the episodic/resident share (see `ScoringConfig::lambda_query`).
        let alpha = self.scoring.lambda_query.clamp(0.0, 1.0);
        let episodic_budget = (budget as f64 * alpha).round() as u32;
        let resident_budget = budget.saturating_sub(episodic_budget);

        let episodic_ctx = self
            .episodic
            .episodic_context(query_embedding.as_deref(), episodic_budget);
        let resident = self.cache.select(query_embedding.as_deref(), query_tokens, resident_budget);

        let mut pinned_records = Vec::new();
        let mut other_episodic_records = Vec::new();
        for id in &episodic_ctx.records {
            if self.episodic.is_pinned(id) {
                pinned_records.push(id.clone());
            } else {
                other_episodic_records.push(id.clone());
            }
        }

        let included_episodes: Vec<memcore_core::memory::Episode> = episodic_ctx
            .episodes
            .iter()
            .filter_map(|id| self.episodic.episode(id))
            .collect();
        let header_text = header::render(&included_episodes);
        let header_tokens = self.estimator.estimate(header_text.as_bytes());

        let mut seen: HashSet<String> = HashSet::new();
        let mut ordered: Vec<String> = Vec::new();
        for id in pinned_records
            .into_iter()
            .chain(resident.into_iter())
            .chain(other_episodic_records.into_iter())
        {
            if seen.insert(id.clone()) {
                ordered.push(id);
            }
        }

        let mut records = Vec::new();
        let mut estimated_tokens = header_tokens + query_tokens;
        let mut excluded_count = 0usize;
        for id in ordered {
            let tokens = self.store.get(&id).map(|r| r.tokens).unwrap_or(0);
            if estimated_tokens + tokens > budget {
                excluded_count += 1;
                continue;
            }
            estimated_tokens += tokens;
            records.push(id);
        }

        if estimated_tokens > budget {
            return Err(ContextError::BudgetViolated {
                estimated: estimated_tokens,
                budget,
            }
            .into());
        }

        debug!(
            records = records.len(),
            estimated_tokens,
            budget,
            excluded_count,
            "context built"
        );

        Ok(WorkingContext {
            records,
            estimated_tokens,
            included_episode_ids: episodic_ctx.episodes,
            excluded_count,
        })
    }
}
