//! `MemoryCore` — owns the Memory Store, Cascading Memory Cache, Episodic
//! Memory Manager, Consolidation Service, and Context Builder behind a
//! single explicitly constructed object.
//!
//! There is no global singleton: callers construct as many independent
//! instances as they need and hold them behind whatever lifetime/ownership
//! fits their process.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use memcore_cache::CascadingCache;
use memcore_consolidation::ConsolidationService;
use memcore_context::{ContextBuilder, WorkingContext};
use memcore_core::config::MemCoreConfig;
use memcore_core::errors::{MemCoreError, MemCoreResult};
use memcore_core::memory::{Episode, Importance, Record, RecordKind};
use memcore_core::outcome::{AdmitOutcome, Degradation, Outcome};
use memcore_core::traits::{Clock, EmbeddingProvider, NoopSummarizer, SystemClock};
use memcore_embeddings::{BruteForceSimilarityIndex, TfIdfProvider};
use memcore_episodic::EpisodicManager;
use memcore_store::snapshot::ParametersManifest;
use memcore_store::{CandidateFilter, MemoryStore, MetadataPatch};
use memcore_tokens::{truncate_to_budget, TokenCounter};
use tracing::{debug, info};

use crate::options::MemoryCoreOptions;
use crate::types::{CsStats, EpmStats, MemoryCoreStats, PutResult, SearchHit};

pub use memcore_consolidation::ConsolidationReport;

pub struct MemoryCore {
    store: Arc<MemoryStore>,
    cache: Arc<CascadingCache>,
    episodic: Arc<EpisodicManager>,
    consolidation: ConsolidationService,
    context_builder: ContextBuilder,
    similarity: Arc<dyn memcore_core::traits::SimilarityIndex>,
    embeddings: Arc<dyn EmbeddingProvider>,
    estimator: Arc<dyn memcore_core::traits::TokenEstimator>,
    clock: Arc<dyn Clock>,
    config: MemCoreConfig,
    logical_time: AtomicU64,
}

impl MemoryCore {
    /// Open (or create) a store at `opts.db_path` (in-memory if absent)
    /// and build every engine around it.
    pub fn new(opts: MemoryCoreOptions) -> MemCoreResult<Self> {
        opts.config
            .validate()
            .map_err(|reason| MemCoreError::InvalidArgument { reason })?;
        let store = Arc::new(match &opts.db_path {
            Some(path) => MemoryStore::open(path)?,
            None => MemoryStore::open_in_memory()?,
        });
        Self::from_store(store, opts)
    }

    /// Restore a store from a snapshot directory and rebuild CMC/EPM's
    /// derived indices by replaying its records. `opts.config` must match
    /// the persisted parameters manifest exactly or this fails with
    /// `Conflict`.
    pub fn restore(dir: &Path, opts: MemoryCoreOptions) -> MemCoreResult<Self> {
        opts.config
            .validate()
            .map_err(|reason| MemCoreError::InvalidArgument { reason })?;
        let manifest = Self::manifest_for(&opts.config);
        let store = Arc::new(memcore_store::snapshot::restore(dir, &manifest)?);
        info!(dir = %dir.display(), "store restored, rebuilding derived indices");
        Self::from_store(store, opts)
    }

    fn from_store(store: Arc<MemoryStore>, opts: MemoryCoreOptions) -> MemCoreResult<Self> {
        let estimator = opts
            .estimator
            .unwrap_or_else(|| Arc::new(TokenCounter::default()));
        let embeddings = opts
            .embeddings
            .unwrap_or_else(|| Arc::new(TfIdfProvider::new(opts.config.embedding_dim)));
        let similarity = opts
            .similarity
            .unwrap_or_else(|| Arc::new(BruteForceSimilarityIndex::new()));
        let summarizer = opts.summarizer.unwrap_or_else(|| Arc::new(NoopSummarizer));
        let synthesizer = opts.synthesizer.unwrap_or_else(|| Arc::new(NoopSummarizer));
        let clock = opts.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let cache = Arc::new(CascadingCache::new(
            &opts.config.tiers,
            store.clone(),
            estimator.clone(),
            embeddings.clone(),
            summarizer.clone(),
            clock.clone(),
            opts.config.scoring.clone(),
        ));
        let episodic = Arc::new(EpisodicManager::new(
            opts.config.epm.clone(),
            opts.config.scoring.clone(),
            cache.clone(),
            store.clone(),
        ));
        let consolidation = ConsolidationService::new(
            store.clone(),
            cache.clone(),
            similarity.clone(),
            summarizer,
            synthesizer,
            estimator.clone(),
            clock.clone(),
            opts.config.cs.clone(),
        );
        let context_builder = ContextBuilder::new(
            store.clone(),
            cache.clone(),
            episodic.clone(),
            estimator.clone(),
            opts.config.scoring.clone(),
        );

        // Only the Memory Store is persisted; CMC residency and EPM
        // episode boundaries are derived state, rebuilt here by replaying
        // every live record in admit order. A no-op on a fresh store.
        let mut live = store.scan_candidates(&CandidateFilter::default());
        live.sort_by_key(|r| r.created_at);
        for record in &live {
            if let Some(embedding) = &record.embedding {
                similarity.insert(&record.id, embedding);
            }
        }
        for record in &live {
            let _ = cache.admit(&record.id, record.importance.value(), record.tokens);
            let _ = episodic.on_record(
                &record.id,
                record.created_at,
                record.kind,
                record.tokens,
                record.embedding.as_deref(),
                record.importance.value(),
            );
        }
        if !live.is_empty() {
            debug!(records = live.len(), "replayed live records into CMC/EPM");
        }

        Ok(Self {
            store,
            cache,
            episodic,
            consolidation,
            context_builder,
            similarity,
            embeddings,
            estimator,
            clock,
            config: opts.config,
            logical_time: AtomicU64::new(0),
        })
    }

    fn next_logical_time(&self) -> u64 {
        self.logical_time.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn manifest_for(config: &MemCoreConfig) -> ParametersManifest {
        ParametersManifest {
            tier_count: config.tiers.len(),
            tier_capacities: config.tiers.iter().map(|t| t.token_capacity).collect(),
            tier_importance_thresholds: config
                .tiers
                .iter()
                .map(|t| t.importance_threshold.to_string())
                .collect(),
            embedding_dim: config.embedding_dim,
        }
    }

    /// `put(content, kind, tags, importance_hint?) -> {id}`:
    /// estimate → truncate-if-over-budget → embed → store → index →
    /// admit into CMC → feed into EPM's episode stream.
    pub fn put(
        &self,
        content: &[u8],
        kind: RecordKind,
        tags: BTreeSet<String>,
        importance_hint: Option<f64>,
    ) -> MemCoreResult<Outcome<PutResult>> {
        let mut degradations = Vec::new();
        let estimated = self.estimator.estimate(content);
        let (content, tokens, truncated, original_tokens) =
            if estimated > self.config.per_record_max_tokens {
                let result =
                    truncate_to_budget(content, self.config.per_record_max_tokens, self.estimator.as_ref());
                degradations.push(Degradation::new(
                    "token_budget",
                    format!(
                        "content truncated from {} to {} tokens",
                        result.original_tokens.unwrap_or(estimated),
                        result.tokens
                    ),
                ));
                (result.content, result.tokens, result.truncated, result.original_tokens)
            } else {
                (content.to_vec(), estimated, false, None)
            };

        let embedding = self.embeddings.embed(&content);
        if embedding.is_none() {
            degradations.push(Degradation::new(
                "embedding",
                format!("provider {} produced no embedding for this content", self.embeddings.name()),
            ));
        }

        let created_at = self.clock.now();
        let importance = Importance::new(importance_hint.unwrap_or_else(|| Importance::default().value()));
        let record = Record::new_ingested(
            content,
            kind,
            created_at,
            tokens,
            embedding,
            importance,
            tags,
            truncated,
            original_tokens,
        );

        self.store.put(&record)?;
        if let Some(embedding) = &record.embedding {
            self.similarity.insert(&record.id, embedding);
        }
        let admit_outcome = self.cache.admit(&record.id, importance.value(), tokens)?;
        if matches!(admit_outcome, AdmitOutcome::Rejected) {
            degradations.push(Degradation::new(
                "cmc_admission",
                "importance below the coldest tier's threshold; record kept in the store only".to_string(),
            ));
        }
        self.episodic.on_record(
            &record.id,
            record.created_at,
            kind,
            tokens,
            record.embedding.as_deref(),
            importance.value(),
        )?;

        Ok(Outcome::degraded(
            PutResult { id: record.id },
            degradations,
            self.next_logical_time(),
        ))
    }

    /// `get(id) -> Record?`. Missing ids resolve to `None`,
    /// not an error — `NotFound` is reserved for `touch`, which performs
    /// an action rather than a lookup.
    pub fn get(&self, id: &str) -> Outcome<Option<Record>> {
        Outcome::ok(self.store.get(id), self.next_logical_time())
    }

    /// `search(query, k, min_similarity) -> [{id, similarity}]`.
    /// Degrades to an empty result (not an error) when the embedding
    /// capability cannot embed the query.
    pub fn search(&self, query: &[u8], k: usize, min_similarity: f32) -> Outcome<Vec<SearchHit>> {
        let mut degradations = Vec::new();
        let hits = match self.embeddings.embed(query) {
            Some(query_embedding) => self
                .similarity
                .query(&query_embedding, k, min_similarity)
                .into_iter()
                .map(|(id, similarity)| SearchHit { id, similarity })
                .collect(),
            None => {
                degradations.push(Degradation::new(
                    "embedding",
                    format!("provider {} could not embed the query", self.embeddings.name()),
                ));
                Vec::new()
            }
        };
        Outcome::degraded(hits, degradations, self.next_logical_time())
    }

    /// `build_context(query, budget) -> WorkingContext`.
    pub fn build_context(&self, query: &[u8], budget: u32) -> MemCoreResult<Outcome<WorkingContext>> {
        if budget == 0 {
            return Err(MemCoreError::InvalidArgument {
                reason: "budget must be positive".to_string(),
            });
        }
        let ctx = self.context_builder.build_context(query, budget)?;
        Ok(Outcome::ok(ctx, self.next_logical_time()))
    }

    /// `touch(id)`: records a retrieval hit against the store
    /// (durable) and against CMC (tier-promotion bookkeeping). `NotFound`
    /// for an unknown id.
    pub fn touch(&self, id: &str) -> MemCoreResult<Outcome<()>> {
        let Some(record) = self.store.get(id) else {
            return Err(MemCoreError::NotFound { id: id.to_string() });
        };
        let now = self.clock.now();
        self.store.update_metadata(
            id,
            MetadataPatch {
                access_count: Some(record.access_count + 1),
                last_access_at: Some(now),
                ..Default::default()
            },
        )?;
        self.cache.touch(id)?;
        Ok(Outcome::ok((), self.next_logical_time()))
    }

    /// `consolidate(deadline?) -> ConsolidationReport`: drains
    /// EPM's pending episode-close queue and hands the closed episodes
    /// to the Consolidation Service for one synchronous pass.
    pub fn consolidate(&self, deadline: Option<i64>) -> MemCoreResult<Outcome<ConsolidationReport>> {
        let due_ids = self.episodic.drain_consolidation_requests();
        let due_episodes: Vec<Episode> = due_ids
            .iter()
            .filter_map(|id| self.episodic.episode(id))
            .collect();
        let report = self.consolidation.consolidate(&due_episodes, deadline)?;
        let degradations = report
            .skipped_capabilities
            .iter()
            .map(|reason| Degradation::new("consolidation", reason.clone()))
            .collect();
        Ok(Outcome::degraded(report, degradations, self.next_logical_time()))
    }

    /// `snapshot(path)`: durable backup of the Memory Store
    /// plus the parameters manifest. CMC/EPM state is not written; it is
    /// rebuilt by `restore`.
    pub fn snapshot(&self, dir: &Path) -> MemCoreResult<Outcome<()>> {
        let manifest = Self::manifest_for(&self.config);
        memcore_store::snapshot::snapshot(&self.store, dir, &manifest)?;
        Ok(Outcome::ok((), self.next_logical_time()))
    }

    /// `stats() -> {store, cmc, epm, cs}`.
    pub fn stats(&self) -> Outcome<MemoryCoreStats> {
        let stats = MemoryCoreStats {
            store_records: self.store.count(),
            cmc: self.cache.stats(),
            epm: EpmStats {
                episode_count: self.episodic.episode_count(),
                pinned_count: self.episodic.pinned_count(),
                pending_consolidation_count: self.episodic.pending_consolidation_count(),
            },
            cs: CsStats {
                running: self.consolidation.is_running(),
            },
        };
        Outcome::ok(stats, self.next_logical_time())
    }

    pub fn config(&self) -> &MemCoreConfig {
        &self.config
    }
}
