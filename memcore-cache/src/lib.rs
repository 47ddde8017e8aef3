//! # memcore-cache
//!
//! The Cascading Memory Cache: a multi-tier, token-bounded
//! cache with importance-weighted eviction, cross-tier promotion and
//! demotion, and progressive compression.

mod cascade;
mod compression;
mod entry;
mod scoring;
mod stats;

pub use cascade::CascadingCache;
pub use entry::CacheEntry;
pub use stats::{CmcStats, TierStats};
