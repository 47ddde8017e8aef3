//! Phase 5: Reweighting — blend current importance with a relationship
//! factor, a recency factor, and a per-kind prior.

use memcore_core::memory::{Record, RecordKind};

const W_CURRENT: f64 = 0.5;
const W_RELATIONSHIP: f64 = 0.2;
const W_RECENCY: f64 = 0.2;
const W_KIND_PRIOR: f64 = 0.1;

/// Recompute a record's importance. `inbound_provenance_count` is how
/// many other candidates in this run cite `record.id` as a parent;
/// `max_inbound` normalizes it across the run's candidate pool.
pub fn reweight(
    record: &Record,
    inbound_provenance_count: usize,
    max_inbound: usize,
    now: i64,
    half_life_nanos: i64,
) -> f64 {
    let relationship_factor = if max_inbound == 0 {
        0.0
    } else {
        inbound_provenance_count as f64 / max_inbound as f64
    };
    let age = (now - record.created_at).max(0) as f64;
    let half_life = half_life_nanos.max(1) as f64;
    let recency_factor = (-age / half_life).exp();
    let kind_prior = kind_prior(record.kind);
    let current = record.importance.value();

    (W_CURRENT * current
        + W_RELATIONSHIP * relationship_factor
        + W_RECENCY * recency_factor
        + W_KIND_PRIOR * kind_prior)
        .clamp(0.0, 1.0)
}

fn kind_prior(kind: RecordKind) -> f64 {
    match kind {
        RecordKind::Summary | RecordKind::Reflection => 0.8,
        RecordKind::Merged => 0.6,
        RecordKind::Fact | RecordKind::Concept | RecordKind::Reference => 0.5,
        RecordKind::Code | RecordKind::Reasoning => 0.5,
        RecordKind::Conversation | RecordKind::System => 0.3,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use memcore_core::memory::Importance;

    use super::*;

    fn record(created_at: i64, importance: f64, kind: RecordKind) -> Record {
        Record::new_ingested(
            b"x".to_vec(),
            kind,
            created_at,
            1,
            None,
            Importance::new(importance),
            BTreeSet::new(),
            false,
            None,
        )
    }

    #[test]
    fn more_inbound_provenance_raises_importance() {
        let r = record(0, 0.3, RecordKind::Fact);
        let low = reweight(&r, 0, 10, 0, 1_000_000);
        let high = reweight(&r, 10, 10, 0, 1_000_000);
        assert!(high > low);
    }

    #[test]
    fn older_records_get_a_smaller_recency_contribution() {
        let r = record(0, 0.3, RecordKind::Fact);
        let fresh = reweight(&r, 0, 1, 0, 1_000_000_000);
        let stale = reweight(&r, 0, 1, 10_000_000_000, 1_000_000_000);
        assert!(fresh > stale);
    }

    #[test]
    fn result_is_clamped_to_unit_interval() {
        let r = record(0, 1.0, RecordKind::Summary);
        let score = reweight(&r, 100, 1, 0, 1_000_000_000);
        assert!(score <= 1.0);
    }
}
