//! Trigger evaluation for background consolidation runs. Overlapping
//! triggers coalesce into a single run via
//! [`crate::service::ConsolidationService`]'s `is_running` guard; this
//! module only decides *whether* a run should be requested.

/// Why a consolidation run was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    Periodic,
    Explicit,
    EpisodeClosed,
    EvictionRateExceeded,
}

/// Evaluate whether a consolidation run should be requested right now.
/// Checked in priority order: an explicit request always wins, then a
/// pending episode-close emission, then cache pressure, then the
/// periodic schedule.
pub fn evaluate_trigger(
    explicit_requested: bool,
    pending_episode_closes: usize,
    eviction_rate: f64,
    eviction_rate_trigger: f64,
    periodic_due: bool,
) -> Option<TriggerReason> {
    if explicit_requested {
        return Some(TriggerReason::Explicit);
    }
    if pending_episode_closes > 0 {
        return Some(TriggerReason::EpisodeClosed);
    }
    if eviction_rate > eviction_rate_trigger {
        return Some(TriggerReason::EvictionRateExceeded);
    }
    if periodic_due {
        return Some(TriggerReason::Periodic);
    }
    None
}
