use std::collections::BTreeSet;
use std::sync::Arc;

use memcore_cache::CascadingCache;
use memcore_context::ContextBuilder;
use memcore_core::config::{EpisodicConfig, ScoringConfig, TierConfig};
use memcore_core::memory::{CompressionPolicy, Importance, Record, RecordKind};
use memcore_core::traits::{Clock, NoopEmbeddingProvider, NoopSummarizer, TokenEstimator};
use memcore_episodic::EpisodicManager;
use memcore_store::MemoryStore;

struct FixedEstimator;
impl TokenEstimator for FixedEstimator {
    fn estimate(&self, content: &[u8]) -> u32 {
        content.len() as u32
    }
}

struct FakeClock;
impl Clock for FakeClock {
    fn now(&self) -> i64 {
        0
    }
}

fn tiers() -> Vec<TierConfig> {
    vec![
        TierConfig {
            token_capacity: 4_000,
            importance_threshold: 0.7,
            compression_policy: CompressionPolicy::None,
            half_life_nanos: 1_000_000_000,
        },
        TierConfig {
            token_capacity: 16_000,
            importance_threshold: 0.0,
            compression_policy: CompressionPolicy::Lossless,
            half_life_nanos: 1_000_000_000,
        },
    ]
}

struct Harness {
    store: Arc<MemoryStore>,
    cache: Arc<CascadingCache>,
    episodic: Arc<EpisodicManager>,
    builder: ContextBuilder,
}

fn harness(epm_config: EpisodicConfig, scoring: ScoringConfig) -> Harness {
    let store = Arc::new(MemoryStore::open_in_memory().unwrap());
    let cache = Arc::new(CascadingCache::new(
        &tiers(),
        store.clone(),
        Arc::new(FixedEstimator),
        Arc::new(NoopEmbeddingProvider),
        Arc::new(NoopSummarizer),
        Arc::new(FakeClock),
        scoring.clone(),
    ));
    let episodic = Arc::new(EpisodicManager::new(epm_config, scoring.clone(), cache.clone(), store.clone()));
    let builder = ContextBuilder::new(
        store.clone(),
        cache.clone(),
        episodic.clone(),
        Arc::new(FixedEstimator),
        scoring,
    );
    Harness {
        store,
        cache,
        episodic,
        builder,
    }
}

fn put_record(h: &Harness, seed: &str, created_at: i64, importance: f64, tokens: u32) -> Record {
    let record = Record::new_ingested(
        format!("content-{seed}").into_bytes(),
        RecordKind::Fact,
        created_at,
        tokens,
        None,
        Importance::new(importance),
        BTreeSet::new(),
        false,
        None,
    );
    h.store.put(&record).unwrap();
    h.cache.admit(&record.id, importance, tokens).unwrap();
    h.episodic
        .on_record(&record.id, created_at, RecordKind::Fact, tokens, None, importance)
        .unwrap();
    record
}

#[test]
fn build_context_stays_within_budget() {
    let h = harness(EpisodicConfig::default(), ScoringConfig::default());
    for i in 0..10 {
        put_record(&h, &i.to_string(), i as i64, 0.5, 20);
    }

    let ctx = h.builder.build_context(b"what happened", 100).unwrap();
    assert!(ctx.estimated_tokens <= 100);
}

#[test]
fn build_context_pins_the_open_episode_first() {
    let h = harness(EpisodicConfig::default(), ScoringConfig::default());
    let a = put_record(&h, "a", 0, 0.9, 20);

    let ctx = h.builder.build_context(b"q", 1_000).unwrap();

    assert!(h.episodic.is_pinned(&a.id));
    assert_eq!(ctx.records.first(), Some(&a.id));
}

#[test]
fn build_context_deduplicates_records_shared_by_epm_and_cmc() {
    let h = harness(EpisodicConfig::default(), ScoringConfig::default());
    let a = put_record(&h, "a", 0, 0.9, 20);

    let ctx = h.builder.build_context(b"q", 1_000).unwrap();

    let occurrences = ctx.records.iter().filter(|id| **id == a.id).count();
    assert_eq!(occurrences, 1);
}

#[test]
fn build_context_reports_excluded_count_under_a_tight_budget() {
    let h = harness(
        EpisodicConfig {
            max_members: 1,
            quantile_warmup_samples: 1000,
            ..EpisodicConfig::default()
        },
        ScoringConfig::default(),
    );
    for i in 0..8 {
        put_record(&h, &i.to_string(), i as i64, 0.5, 20);
    }

    let ctx = h.builder.build_context(b"q", 100).unwrap();
    assert!(ctx.excluded_count > 0);
    assert!(ctx.estimated_tokens <= 100);
}
