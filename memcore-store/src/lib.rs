//! # memcore-store
//!
//! The Memory Store: append-only, SQLite-backed persistence
//! with a DashMap read-through cache, plus snapshot/restore for the
//! on-disk durable state layout.

mod codec;
pub mod engine;
mod schema;
pub mod snapshot;

pub use engine::{CandidateFilter, MemoryStore, MetadataPatch};
pub use snapshot::ParametersManifest;
