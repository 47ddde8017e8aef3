//! Phase 1: Grouping — partition candidates by `(kind, coarse_time_bucket)`
//! ahead of redundancy detection.

use std::collections::HashMap;

use memcore_core::memory::{Record, RecordKind};

/// Groups eligible for merge-candidate detection. Records whose `kind` is
/// merge-exempt (`summary`, `reflection`) never enter a group.
pub fn group_candidates(
    candidates: &[Record],
    bucket_nanos: i64,
    min_group_size: usize,
) -> Vec<Vec<Record>> {
    let mut groups: HashMap<(RecordKind, i64), Vec<Record>> = HashMap::new();
    for record in candidates {
        if record.kind.is_merge_exempt() || record.archived {
            continue;
        }
        let bucket = if bucket_nanos > 0 {
            record.created_at / bucket_nanos
        } else {
            0
        };
        groups.entry((record.kind, bucket)).or_default().push(record.clone());
    }
    let floor = min_group_size.max(2);
    groups.into_values().filter(|g| g.len() >= floor).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use memcore_core::memory::Importance;

    use super::*;

    fn record(seed: &str, kind: RecordKind, created_at: i64) -> Record {
        Record::new_ingested(
            format!("content-{seed}").into_bytes(),
            kind,
            created_at,
            10,
            None,
            Importance::new(0.5),
            BTreeSet::new(),
            false,
            None,
        )
    }

    #[test]
    fn groups_by_kind_and_bucket() {
        let records = vec![
            record("a", RecordKind::Fact, 0),
            record("b", RecordKind::Fact, 1),
            record("c", RecordKind::Fact, 1_000_000),
        ];
        let groups = group_candidates(&records, 100, 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn excludes_merge_exempt_kinds() {
        let records = vec![
            record("a", RecordKind::Summary, 0),
            record("b", RecordKind::Summary, 1),
        ];
        assert!(group_candidates(&records, 100, 2).is_empty());
    }

    #[test]
    fn drops_groups_below_minimum_size() {
        let records = vec![record("a", RecordKind::Fact, 0)];
        assert!(group_candidates(&records, 100, 2).is_empty());
    }
}
