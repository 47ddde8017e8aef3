use std::collections::BTreeSet;
use std::sync::Arc;

use memcore_cache::CascadingCache;
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

fn make_manager(store: Arc<MemoryStore>, config: EpisodicConfig) -> EpisodicManager {
    let cache = Arc::new(CascadingCache::new(
        &tiers(),
        store.clone(),
        Arc::new(FixedEstimator),
        Arc::new(NoopEmbeddingProvider),
        Arc::new(NoopSummarizer),
        Arc::new(FakeClock),
        ScoringConfig::default(),
    ));
    EpisodicManager::new(config, ScoringConfig::default(), cache, store)
}

fn put_record(store: &MemoryStore, seed: &str, created_at: i64, kind: RecordKind) -> Record {
    let record = Record::new_ingested(
        format!("content-{seed}").into_bytes(),
        kind,
        created_at,
        10,
        None,
        Importance::new(0.5),
        BTreeSet::new(),
        false,
        None,
    );
    store.put(&record).unwrap();
    record
}

#[test]
fn first_record_opens_an_episode() {
    let store = Arc::new(MemoryStore::open_in_memory().unwrap());
    let manager = make_manager(store.clone(), EpisodicConfig::default());
    let record = put_record(&store, "a", 0, RecordKind::Conversation);

    let outcome = manager
        .on_record(&record.id, 0, RecordKind::Conversation, 10, None, 0.5)
        .unwrap();
    assert!(outcome.boundary);
    assert_eq!(manager.episode_count(), 1);
}

#[test]
fn kind_change_with_long_gap_forces_a_new_episode() {
    let store = Arc::new(MemoryStore::open_in_memory().unwrap());
    let config = EpisodicConfig {
        quantile_warmup_samples: 1000,
        ..EpisodicConfig::default()
    };
    let manager = make_manager(store.clone(), config);

    let a = put_record(&store, "a", 0, RecordKind::Conversation);
    manager
        .on_record(&a.id, 0, RecordKind::Conversation, 10, None, 0.5)
        .unwrap();

    let b = put_record(&store, "b", 10_000_000_000, RecordKind::Code);
    let outcome = manager
        .on_record(&b.id, 10_000_000_000, RecordKind::Code, 10, None, 0.5)
        .unwrap();

    assert!(outcome.boundary);
    assert_eq!(manager.episode_count(), 2);
}

#[test]
fn max_members_force_closes_an_episode() {
    let store = Arc::new(MemoryStore::open_in_memory().unwrap());
    let config = EpisodicConfig {
        max_members: 2,
        quantile_warmup_samples: 1000,
        ..EpisodicConfig::default()
    };
    let manager = make_manager(store.clone(), config);

    for i in 0..3 {
        let r = put_record(&store, &i.to_string(), i as i64, RecordKind::Fact);
        manager
            .on_record(&r.id, i as i64, RecordKind::Fact, 10, None, 0.5)
            .unwrap();
    }

    assert_eq!(manager.episode_count(), 2);
}

#[test]
fn open_episode_members_are_pinned_in_the_cache() {
    let store = Arc::new(MemoryStore::open_in_memory().unwrap());
    let manager = make_manager(store.clone(), EpisodicConfig::default());
    let a = put_record(&store, "a", 0, RecordKind::Fact);

    manager
        .on_record(&a.id, 0, RecordKind::Fact, 10, None, 0.5)
        .unwrap();

    assert!(manager.is_pinned(&a.id));
}

#[test]
fn episodic_context_respects_token_budget() {
    let store = Arc::new(MemoryStore::open_in_memory().unwrap());
    let config = EpisodicConfig {
        max_members: 1,
        quantile_warmup_samples: 1000,
        ..EpisodicConfig::default()
    };
    let manager = make_manager(store.clone(), config);

    for i in 0..5 {
        let r = put_record(&store, &i.to_string(), i as i64, RecordKind::Fact);
        manager
            .on_record(&r.id, i as i64, RecordKind::Fact, 10, None, 0.5)
            .unwrap();
    }

    let context = manager.episodic_context(None, 25);
    assert!(context.estimated_tokens <= 25);
    assert!(!context.episodes.is_empty());
}

#[test]
fn closing_a_large_episode_queues_a_consolidation_request() {
    let store = Arc::new(MemoryStore::open_in_memory().unwrap());
    let config = EpisodicConfig {
        max_members: 1,
        summarize_threshold: 5,
        quantile_warmup_samples: 1000,
        ..EpisodicConfig::default()
    };
    let manager = make_manager(store.clone(), config);

    let a = put_record(&store, "a", 0, RecordKind::Fact);
    manager
        .on_record(&a.id, 0, RecordKind::Fact, 10, None, 0.5)
        .unwrap();
    let b = put_record(&store, "b", 1, RecordKind::Fact);
    manager
        .on_record(&b.id, 1, RecordKind::Fact, 10, None, 0.5)
        .unwrap();

    let pending = manager.drain_consolidation_requests();
    assert_eq!(pending.len(), 1);
}
