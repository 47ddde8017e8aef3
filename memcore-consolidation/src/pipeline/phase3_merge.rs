//! Phase 3: Merge — collapse a redundancy component into one `merged`
//! record.

use std::collections::BTreeSet;

use memcore_core::memory::{Importance, Record, RecordKind};
use memcore_core::traits::{SynthesizeMerge, TokenEstimator};

/// Importance bonus applied to a merged record over its strongest
/// constituent, reflecting corroboration (capped at 1.0).
const MERGE_IMPORTANCE_EPSILON: f64 = 0.05;

pub struct MergeOutcome {
    pub new_record: Record,
    pub archived_ids: Vec<String>,
}

/// Build the merged record for one connected component. `now` becomes the
/// new record's `created_at`, so distinct components merged in the same
/// run still get distinct content-addressed ids as long as their content
/// differs.
pub fn merge_component(
    component: &[Record],
    synthesizer: &dyn SynthesizeMerge,
    estimator: &dyn TokenEstimator,
    now: i64,
) -> MergeOutcome {
    let representative = component
        .iter()
        .max_by(|a, b| {
            a.importance
                .value()
                .partial_cmp(&b.importance.value())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.created_at.cmp(&b.created_at))
        })
        .expect("merge component is non-empty")
        .clone();

    let content = synthesizer
        .synthesize(component)
        .unwrap_or_else(|| representative.content.clone());
    let tokens = estimator.estimate(&content);
    let max_importance = component
        .iter()
        .map(|r| r.importance.value())
        .fold(0.0_f64, f64::max);
    let importance = Importance::new((max_importance + MERGE_IMPORTANCE_EPSILON).min(1.0));
    let provenance: BTreeSet<String> = component.iter().map(|r| r.id.clone()).collect();
    let id = Record::compute_id(&content, now);

    let new_record = Record {
        id,
        content,
        kind: RecordKind::Merged,
        created_at: now,
        tokens,
        embedding: None,
        importance,
        access_count: 0,
        last_access_at: now,
        tags: BTreeSet::new(),
        provenance,
        compression_level: 0,
        archived: false,
        truncated: false,
        original_tokens: None,
    };

    MergeOutcome {
        new_record,
        archived_ids: component.iter().map(|r| r.id.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use memcore_core::traits::NoopSummarizer;

    use super::*;

    struct ByteLenEstimator;
    impl TokenEstimator for ByteLenEstimator {
        fn estimate(&self, content: &[u8]) -> u32 {
            content.len() as u32
        }
    }

    fn record(created_at: i64, importance: f64) -> Record {
        Record::new_ingested(
            b"The quick brown fox".to_vec(),
            RecordKind::Fact,
            created_at,
            19,
            None,
            Importance::new(importance),
            BTreeSet::new(),
            false,
            None,
        )
    }

    #[test]
    fn picks_highest_importance_then_created_at_as_representative() {
        let a = record(0, 0.5);
        let b = record(1, 0.7);
        let component = vec![a.clone(), b.clone()];
        let outcome = merge_component(&component, &NoopSummarizer, &ByteLenEstimator, 100);

        assert_eq!(outcome.new_record.kind, RecordKind::Merged);
        assert_eq!(outcome.new_record.content, b.content);
        assert!((outcome.new_record.importance.value() - 0.75).abs() < 1e-9);
        assert_eq!(outcome.archived_ids.len(), 2);
    }

    #[test]
    fn caps_importance_at_one() {
        let a = record(0, 0.98);
        let b = record(1, 0.99);
        let outcome = merge_component(&[a, b], &NoopSummarizer, &ByteLenEstimator, 100);
        assert!(outcome.new_record.importance.value() <= 1.0);
    }
}
