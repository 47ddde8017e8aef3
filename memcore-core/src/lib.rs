//! # memcore-core
//!
//! Foundation crate for the memcore hierarchical memory system.
//! Defines the record/episode/tier data model, capability traits,
//! configuration, constants, and the unified error type. Every other
//! crate in the workspace depends on this one.

pub mod config;
pub mod constants;
pub mod errors;
pub mod memory;
pub mod outcome;
pub mod traits;

pub use config::MemCoreConfig;
pub use errors::{MemCoreError, MemCoreResult};
pub use memory::{CacheTier, CompressionPolicy, Episode, Importance, Record, RecordKind};
pub use outcome::{AdmitOutcome, Degradation};
