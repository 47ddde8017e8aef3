//! `ConsolidationService` — runs the 6-phase pipeline under a
//! single-execution guard.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use memcore_cache::CascadingCache;
use memcore_core::config::ConsolidationConfig;
use memcore_core::errors::{ConsolidationError, MemCoreResult};
use memcore_core::memory::Episode;
use memcore_core::traits::{Clock, Summarizer, SynthesizeMerge, TokenEstimator};
use memcore_store::{CandidateFilter, MemoryStore, MetadataPatch};
use tracing::{info, warn};

use crate::pipeline::{
    phase1_grouping, phase2_redundancy, phase3_merge, phase4_episode_summary, phase5_reweight,
    phase6_pruning,
};
use crate::report::ConsolidationReport;

/// Reweighting tolerance below which a recomputed importance is treated
/// as unchanged, so repeated runs with no intervening `put` report zero
/// mutations.
const REWEIGHT_EPSILON: f64 = 1e-6;

/// Half-life for phase 5's recency factor: 7 days, in nanoseconds.
/// Independent of CMC's per-tier half-lives — reweighting values records
/// on a slower, store-wide timescale.
const REWEIGHT_RECENCY_HALF_LIFE_NANOS: i64 = 7 * 24 * 3_600 * 1_000_000_000;

pub struct ConsolidationService {
    store: Arc<MemoryStore>,
    cache: Arc<CascadingCache>,
    similarity: Arc<dyn memcore_core::traits::SimilarityIndex>,
    summarizer: Arc<dyn Summarizer>,
    synthesizer: Arc<dyn SynthesizeMerge>,
    estimator: Arc<dyn TokenEstimator>,
    clock: Arc<dyn Clock>,
    config: ConsolidationConfig,
    is_running: AtomicBool,
}

impl ConsolidationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<MemoryStore>,
        cache: Arc<CascadingCache>,
        similarity: Arc<dyn memcore_core::traits::SimilarityIndex>,
        summarizer: Arc<dyn Summarizer>,
        synthesizer: Arc<dyn SynthesizeMerge>,
        estimator: Arc<dyn TokenEstimator>,
        clock: Arc<dyn Clock>,
        config: ConsolidationConfig,
    ) -> Self {
        Self {
            store,
            cache,
            similarity,
            summarizer,
            synthesizer,
            estimator,
            clock,
            config,
            is_running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Run one consolidation pass synchronously.
    /// `due_episodes` are closed episodes eligible for phase 4
    /// summarization (owned and filtered by the caller, since CS has no
    /// dependency on the Episodic Memory Manager). `deadline`, if set, is
    /// a clock timestamp checked between phases.
    pub fn consolidate(
        &self,
        due_episodes: &[Episode],
        deadline: Option<i64>,
    ) -> MemCoreResult<ConsolidationReport> {
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConsolidationError::AlreadyRunning.into());
        }
        let result = self.run(due_episodes, deadline);
        self.is_running.store(false, Ordering::SeqCst);
        result
    }

    fn check_deadline(&self, deadline: Option<i64>, phase: &str) -> MemCoreResult<()> {
        if let Some(dl) = deadline {
            if self.clock.now() >= dl {
                warn!(phase, "consolidation deadline exceeded");
                return Err(ConsolidationError::DeadlineExceeded {
                    phase: phase.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn run(&self, due_episodes: &[Episode], deadline: Option<i64>) -> MemCoreResult<ConsolidationReport> {
        let mut report = ConsolidationReport::default();
        let candidates = self.store.scan_candidates(&CandidateFilter::default());
        // Records created by phases 3/4 this run join the reweight/pruning
        // pool immediately, so a run reaches a fixed point by the time it
        // returns instead of leaving new records unreweighted until the
        // next run, which would otherwise break idempotence.
        let mut new_records: Vec<memcore_core::memory::Record> = Vec::new();

        let groups = phase1_grouping::group_candidates(
            &candidates,
            self.config.coarse_time_bucket_nanos,
            self.config.min_group_size,
        );
        report.groups_considered = groups.len();
        self.check_deadline(deadline, "grouping")?;

        for group in &groups {
            let merge_candidates = phase2_redundancy::find_merge_candidates(
                group,
                self.similarity.as_ref(),
                self.config.redundancy_threshold,
            );
            report.merge_candidates += merge_candidates.len();

            for candidate in &merge_candidates {
                self.check_deadline(deadline, "merge")?;
                let now = self.clock.now();
                let outcome = phase3_merge::merge_component(
                    &candidate.records,
                    self.synthesizer.as_ref(),
                    self.estimator.as_ref(),
                    now,
                );
                let committed = self.commit_new_record(outcome.new_record.clone(), &mut report.merged)?;
                new_records.push(committed);
                for archived_id in &outcome.archived_ids {
                    self.archive(archived_id, &mut report)?;
                }
            }
        }
        self.check_deadline(deadline, "redundancy")?;

        for episode in due_episodes {
            self.check_deadline(deadline, "episode_summary")?;
            let members: Vec<_> = episode
                .member_ids
                .iter()
                .filter_map(|id| self.store.get(id))
                .collect();
            if members.is_empty() {
                continue;
            }
            let now = self.clock.now();
            match phase4_episode_summary::summarize_episode(
                episode,
                &members,
                self.summarizer.as_ref(),
                self.estimator.as_ref(),
                self.config.min_summary_importance,
                now,
            ) {
                Some(new_record) => {
                    let committed = self.commit_new_record(new_record, &mut report.summarized)?;
                    new_records.push(committed);
                }
                None => {
                    report
                        .skipped_capabilities
                        .push(format!("summarizer unavailable for episode {}", episode.id));
                    info!(episode_id = %episode.id, "phase 4 skipped: no summarization capability");
                }
            }
        }
        self.check_deadline(deadline, "summarization")?;

        let archived_this_run: std::collections::HashSet<&String> = report.archived.iter().collect();
        let reweight_pool: Vec<&memcore_core::memory::Record> =
            candidates.iter().chain(new_records.iter()).collect();
        let mut inbound: HashMap<String, usize> = HashMap::new();
        for record in reweight_pool.iter().copied() {
            for parent in &record.provenance {
                *inbound.entry(parent.clone()).or_insert(0) += 1;
            }
        }
        let max_inbound = inbound.values().copied().max().unwrap_or(0);
        let now = self.clock.now();

        for record in reweight_pool.iter().copied() {
            if archived_this_run.contains(&record.id) {
                continue;
            }
            let inbound_count = inbound.get(&record.id).copied().unwrap_or(0);
            let new_importance = phase5_reweight::reweight(
                record,
                inbound_count,
                max_inbound,
                now,
                REWEIGHT_RECENCY_HALF_LIFE_NANOS,
            );
            if (new_importance - record.importance.value()).abs() > REWEIGHT_EPSILON {
                self.store.update_metadata(
                    &record.id,
                    MetadataPatch {
                        importance: Some(memcore_core::memory::Importance::new(new_importance)),
                        ..Default::default()
                    },
                )?;
                report.reweighted += 1;
            }
        }
        self.check_deadline(deadline, "reweighting")?;

        let mut younger_cites: HashMap<&str, i64> = HashMap::new();
        for record in reweight_pool.iter().copied() {
            for parent in &record.provenance {
                let entry = younger_cites.entry(parent.as_str()).or_insert(i64::MIN);
                *entry = (*entry).max(record.created_at);
            }
        }

        for record in reweight_pool.iter().copied() {
            if archived_this_run.contains(&record.id) {
                continue;
            }
            let current_importance = self
                .store
                .get(&record.id)
                .map(|r| r.importance.value())
                .unwrap_or(record.importance.value());
            let pinned = self.cache.is_pinned(&record.id);
            let referenced_by_younger = younger_cites
                .get(record.id.as_str())
                .is_some_and(|&t| t > record.created_at);

            if phase6_pruning::should_prune(
                record,
                current_importance,
                self.config.prune_threshold,
                pinned,
                referenced_by_younger,
            ) {
                self.archive(&record.id, &mut report)?;
            }
        }

        info!(
            merged = report.merged.len(),
            summarized = report.summarized.len(),
            archived = report.archived.len(),
            reweighted = report.reweighted,
            "consolidation run complete"
        );
        Ok(report)
    }

    fn commit_new_record(
        &self,
        record: memcore_core::memory::Record,
        out: &mut Vec<String>,
    ) -> MemCoreResult<memcore_core::memory::Record> {
        let mut record = record;
        if let Some(embedding) = self.cache.embeddings().embed(&record.content) {
            record.embedding = Some(embedding);
        }
        self.store.put(&record)?;
        if let Some(embedding) = &record.embedding {
            self.similarity.insert(&record.id, embedding);
        }
        self.cache.admit(&record.id, record.importance.value(), record.tokens)?;
        out.push(record.id.clone());
        Ok(record)
    }

    fn archive(&self, id: &str, report: &mut ConsolidationReport) -> MemCoreResult<()> {
        self.store.archive(id)?;
        self.similarity.remove(id);
        self.cache.remove(id);
        report.archived.push(id.to_string());
        Ok(())
    }
}
