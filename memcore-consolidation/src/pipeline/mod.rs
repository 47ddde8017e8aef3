//! The 6-phase consolidation pipeline:
//! Grouping → Redundancy detection → Merge → Episode summarization →
//! Reweighting → Pruning. Each phase is idempotent in isolation; the
//! orchestration lives in [`crate::service::ConsolidationService`].

pub mod phase1_grouping;
pub mod phase2_redundancy;
pub mod phase3_merge;
pub mod phase4_episode_summary;
pub mod phase5_reweight;
pub mod phase6_pruning;
