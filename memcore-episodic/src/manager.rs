//! `EpisodicManager` — surprise-driven event segmentation and episodic
//! retrieval.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use memcore_cache::CascadingCache;
use memcore_core::config::{EpisodicConfig, ScoringConfig};
use memcore_core::errors::{EpisodicError, MemCoreResult};
use memcore_core::memory::{Episode, RecordKind};
use memcore_embeddings::cosine_similarity;
use memcore_store::MemoryStore;
use tracing::{debug, info};
use uuid::Uuid;

use crate::context::{EpisodicContext, OnRecordOutcome};
use crate::quantile::AdaptiveQuantile;

/// Centroid update rate: newer members pull the running centroid further
/// than older ones (exponentially weighted mean).
const CENTROID_ALPHA: f32 = 0.3;

struct OpenTrack {
    last_kind: RecordKind,
    last_created_at: i64,
}

struct EpmState {
    episodes: Vec<Episode>,
    open_track: Option<OpenTrack>,
    quantile: AdaptiveQuantile,
    pinned: HashSet<String>,
    pending_consolidation: VecDeque<String>,
}

/// The Episodic Memory Manager. Segments an admit stream into
/// episodes by Bayesian-surprise thresholding, pins the live working set
/// in the Cascading Memory Cache, and serves episode-aware retrieval.
pub struct EpisodicManager {
    state: Mutex<EpmState>,
    config: EpisodicConfig,
    scoring: ScoringConfig,
    cache: Arc<CascadingCache>,
    store: Arc<MemoryStore>,
}

impl EpisodicManager {
    pub fn new(
        config: EpisodicConfig,
        scoring: ScoringConfig,
        cache: Arc<CascadingCache>,
        store: Arc<MemoryStore>,
    ) -> Self {
        let quantile = AdaptiveQuantile::new(config.adaptive_quantile, 512);
        Self {
            state: Mutex::new(EpmState {
                episodes: Vec::new(),
                open_track: None,
                quantile,
                pinned: HashSet::new(),
                pending_consolidation: VecDeque::new(),
            }),
            config,
            scoring,
            cache,
            store,
        }
    }

    /// Admit a newly stored record into the episode stream.
    pub fn on_record(
        &self,
        record_id: &str,
        created_at: i64,
        kind: RecordKind,
        tokens: u32,
        embedding: Option<&[f32]>,
        importance: f64,
    ) -> MemCoreResult<OnRecordOutcome> {
        let mut state = self.state.lock().expect("epm lock poisoned");
        let mut closed_episode_id = None;
        let mut boundary = false;

        let should_close = if let Some(open) = state.episodes.last().filter(|e| e.is_open()) {
            let surprise = self.surprise(open, &state.open_track, kind, created_at, embedding);
            let threshold = state
                .quantile
                .threshold(self.config.surprise_threshold_bootstrap, self.config.quantile_warmup_samples);
            let over_span = created_at - open.opened_at >= self.config.max_episode_span_nanos;
            let over_members = open.member_ids.len() >= self.config.max_members;
            let is_boundary = surprise >= threshold || over_span || over_members;
            if !is_boundary {
                state.quantile.record(surprise);
            }
            is_boundary
        } else {
            true
        };

        if should_close {
            if let Some(open) = state.episodes.iter_mut().rev().find(|e| e.is_open()) {
                open.closed_at = Some(created_at);
                if open.size_tokens >= self.config.summarize_threshold {
                    state.pending_consolidation.push_back(open.id.clone());
                    closed_episode_id = Some(open.id.clone());
                }
                debug!(episode_id = %open.id, size_tokens = open.size_tokens, "episode closed");
            }
            let episode = Episode {
                id: Uuid::new_v4().to_string(),
                member_ids: vec![record_id.to_string()],
                opened_at: created_at,
                closed_at: None,
                centroid_embedding: embedding.map(|e| e.to_vec()),
                surprise_at_open: 0.0,
                size_tokens: tokens,
            };
            info!(episode_id = %episode.id, "episode opened");
            state.episodes.push(episode);
            state.open_track = Some(OpenTrack {
                last_kind: kind,
                last_created_at: created_at,
            });
            boundary = true;
        } else {
            let open = state
                .episodes
                .last_mut()
                .filter(|e| e.is_open())
                .ok_or(EpisodicError::NoOpenEpisode)?;
            open.member_ids.push(record_id.to_string());
            open.size_tokens += tokens;
            open.centroid_embedding = match (&open.centroid_embedding, embedding) {
                (Some(centroid), Some(e)) => Some(ewma(centroid, e)),
                (None, Some(e)) => Some(e.to_vec()),
                (centroid, None) => centroid.clone(),
            };
            state.open_track = Some(OpenTrack {
                last_kind: kind,
                last_created_at: created_at,
            });
        }

        let episode_id = state
            .episodes
            .last()
            .expect("an episode always exists after on_record")
            .id
            .clone();

        self.refresh_pins(&mut state);
        let _ = importance;

        Ok(OnRecordOutcome {
            episode_id,
            boundary,
            closed_episode_id,
        })
    }

    fn surprise(
        &self,
        open: &Episode,
        track: &Option<OpenTrack>,
        kind: RecordKind,
        created_at: i64,
        embedding: Option<&[f32]>,
    ) -> f64 {
        if let (Some(centroid), Some(e)) = (&open.centroid_embedding, embedding) {
            return (1.0 - cosine_similarity(e, centroid) as f64).clamp(0.0, 2.0);
        }
        let Some(track) = track else {
            return 0.0;
        };
        let kind_component = if track.last_kind == kind { 0.2 } else { 0.6 };
        let inter_arrival = (created_at - track.last_created_at).max(0) as f64;
        let span = self.config.max_episode_span_nanos.max(1) as f64;
        let time_component = (inter_arrival / span).min(1.0);
        (0.5 * kind_component + 0.5 * time_component).clamp(0.0, 1.0)
    }

    /// Recompute the pin set (open episode + `pin_count` most-recently
    /// closed) and push any changes to the Cascading Memory Cache.
    fn refresh_pins(&self, state: &mut EpmState) {
        let mut target: HashSet<String> = HashSet::new();
        let total = state.episodes.len();
        let mut closed_seen = 0usize;
        for episode in state.episodes.iter().rev() {
            if episode.is_open() {
                target.extend(episode.member_ids.iter().cloned());
            } else if closed_seen < self.config.pin_count {
                target.extend(episode.member_ids.iter().cloned());
                closed_seen += 1;
            } else {
                break;
            }
        }
        let _ = total;

        for id in target.difference(&state.pinned) {
            self.cache.set_pinned(id, true);
        }
        for id in state.pinned.difference(&target) {
            self.cache.set_pinned(id, false);
        }
        state.pinned = target;
    }

    /// Episode-aware retrieval.
    pub fn episodic_context(&self, query_embedding: Option<&[f32]>, budget: u32) -> EpisodicContext {
        let state = self.state.lock().expect("epm lock poisoned");
        let mut scored: Vec<(&Episode, f64)> = state
            .episodes
            .iter()
            .map(|episode| {
                let sim = match (query_embedding, &episode.centroid_embedding) {
                    (Some(q), Some(c)) => cosine_similarity(q, c) as f64,
                    _ => 0.0,
                };
                let importances: Vec<f64> = episode
                    .member_ids
                    .iter()
                    .filter_map(|id| self.store.get(id).map(|r| r.importance.value()))
                    .collect();
                let mean_importance = episode.mean_importance(&importances);
                let score = self.scoring.lambda_query * sim + (1.0 - self.scoring.lambda_query) * mean_importance;
                (episode, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut episodes = Vec::new();
        let mut records = Vec::new();
        let mut estimated_tokens = 0u32;
        for (episode, _score) in scored {
            if estimated_tokens + episode.size_tokens > budget {
                continue;
            }
            estimated_tokens += episode.size_tokens;
            episodes.push(episode.id.clone());
            records.extend(episode.member_ids.iter().cloned());
        }

        EpisodicContext {
            episodes,
            records,
            estimated_tokens,
        }
    }

    /// Drain episode ids queued for consolidation since the last call.
    pub fn drain_consolidation_requests(&self) -> Vec<String> {
        let mut state = self.state.lock().expect("epm lock poisoned");
        state.pending_consolidation.drain(..).collect()
    }

    pub fn is_pinned(&self, record_id: &str) -> bool {
        let state = self.state.lock().expect("epm lock poisoned");
        state.pinned.contains(record_id)
    }

    pub fn episode_count(&self) -> usize {
        let state = self.state.lock().expect("epm lock poisoned");
        state.episodes.len()
    }

    pub fn open_episode_id(&self) -> Option<String> {
        let state = self.state.lock().expect("epm lock poisoned");
        state.episodes.last().filter(|e| e.is_open()).map(|e| e.id.clone())
    }

    pub fn pinned_count(&self) -> usize {
        let state = self.state.lock().expect("epm lock poisoned");
        state.pinned.len()
    }

    /// Episodes currently queued for phase-4 summarization, not yet
    /// drained by a `consolidate` call.
    pub fn pending_consolidation_count(&self) -> usize {
        let state = self.state.lock().expect("epm lock poisoned");
        state.pending_consolidation.len()
    }

    /// Fetch a clone of an episode by id, for callers (the Context
    /// Builder's header construction) that need its time range/size
    /// rather than just its member ids.
    pub fn episode(&self, episode_id: &str) -> Option<memcore_core::memory::Episode> {
        let state = self.state.lock().expect("epm lock poisoned");
        state.episodes.iter().find(|e| e.id == episode_id).cloned()
    }
}

fn ewma(centroid: &[f32], new: &[f32]) -> Vec<f32> {
    if centroid.len() != new.len() {
        return new.to_vec();
    }
    centroid
        .iter()
        .zip(new.iter())
        .map(|(c, n)| (1.0 - CENTROID_ALPHA) * c + CENTROID_ALPHA * n)
        .collect()
}
