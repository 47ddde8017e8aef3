use std::collections::BTreeSet;

use memcore_core::memory::{Importance, Record, RecordKind};

fn make_record(content: &str, created_at: i64) -> Record {
    Record::new_ingested(
        content.as_bytes().to_vec(),
        RecordKind::Fact,
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
fn id_is_content_addressed() {
    let a = make_record("hello", 1);
    let b = make_record("hello", 1);
    assert_eq!(a.id, b.id);
}

#[test]
fn id_differs_on_created_at() {
    let a = make_record("hello", 1);
    let b = make_record("hello", 2);
    assert_ne!(a.id, b.id);
}

#[test]
fn id_differs_on_content() {
    let a = make_record("hello", 1);
    let b = make_record("world", 1);
    assert_ne!(a.id, b.id);
}

#[test]
fn fresh_ingested_record_has_empty_provenance_and_zero_compression() {
    let record = make_record("hello", 1);
    assert!(record.provenance.is_empty());
    assert_eq!(record.compression_level, 0);
    assert!(!record.archived);
}

#[test]
fn importance_clamps_to_unit_interval() {
    assert_eq!(Importance::new(1.5).value(), 1.0);
    assert_eq!(Importance::new(-0.5).value(), 0.0);
    assert_eq!(Importance::new(0.42).value(), 0.42);
}

#[test]
fn summary_and_reflection_are_merge_and_prune_exempt() {
    assert!(RecordKind::Summary.is_merge_exempt());
    assert!(RecordKind::Reflection.is_merge_exempt());
    assert!(!RecordKind::Fact.is_merge_exempt());
    assert!(RecordKind::Summary.is_prune_exempt());
    assert!(!RecordKind::Conversation.is_prune_exempt());
}
