//! Phase 4: Episode summarization — turn a closed, large-enough episode
//! into a `summary` record.

use std::collections::BTreeSet;

use memcore_core::memory::{Episode, Importance, Record, RecordKind};
use memcore_core::traits::{Summarizer, TokenEstimator};

/// Returns `None` (not an error) if the summarizer capability declines,
/// per the skip-and-log degradation policy.
pub fn summarize_episode(
    episode: &Episode,
    members: &[Record],
    summarizer: &dyn Summarizer,
    estimator: &dyn TokenEstimator,
    min_summary_importance: f64,
    now: i64,
) -> Option<Record> {
    let content = summarizer.summarize(members)?;
    let tokens = estimator.estimate(&content);
    let importances: Vec<f64> = members.iter().map(|m| m.importance.value()).collect();
    let importance = Importance::new(episode.mean_importance(&importances).max(min_summary_importance));
    let provenance: BTreeSet<String> = episode.member_ids.iter().cloned().collect();
    let id = Record::compute_id(&content, now);

    Some(Record {
        id,
        content,
        kind: RecordKind::Summary,
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
    })
}
