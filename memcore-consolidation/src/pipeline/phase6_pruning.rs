//! Phase 6: Pruning — archive records that have fallen below the
//! importance floor and are not otherwise protected.

use memcore_core::memory::Record;

/// Whether `record` should be archived this run. `pinned` comes from the
/// Cascading Memory Cache's episode pin; `referenced_by_younger` is true
/// if some other record with a later `created_at` cites this id in its
/// provenance.
pub fn should_prune(
    record: &Record,
    current_importance: f64,
    prune_threshold: f64,
    pinned: bool,
    referenced_by_younger: bool,
) -> bool {
    if record.kind.is_prune_exempt() || record.archived {
        return false;
    }
    if pinned || referenced_by_younger {
        return false;
    }
    current_importance < prune_threshold
}
