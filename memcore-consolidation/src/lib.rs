//! # memcore-consolidation
//!
//! The Consolidation Service: a scheduled/triggered
//! background pass that deduplicates, merges, summarizes episodes,
//! re-weights importance, and prunes under a retention policy. Runs
//! under a single-execution guard; overlapping triggers coalesce.

pub mod pipeline;
mod report;
mod scheduler;
mod service;

pub use report::ConsolidationReport;
pub use scheduler::{evaluate_trigger, TriggerReason};
pub use service::ConsolidationService;
