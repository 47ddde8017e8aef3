//! # memcore
//!
//! Hierarchical long-lived memory core for LLM agents: a Memory Store,
//! Cascading Memory Cache, Episodic Memory Manager, Consolidation
//! Service, and Context Builder, composed behind a single `MemoryCore`
//! facade.
//!
//! ```no_run
//! use memcore::{MemoryCore, MemoryCoreOptions};
//! use memcore_core::memory::RecordKind;
//! use std::collections::BTreeSet;
//!
//! let core = MemoryCore::new(MemoryCoreOptions::default())?;
//! let put = core.put(b"hello", RecordKind::Fact, BTreeSet::new(), None)?;
//! let record = core.get(&put.result.id).result;
//! assert!(record.is_some());
//! # Ok::<(), memcore_core::errors::MemCoreError>(())
//! ```

mod core;
mod options;
mod types;

pub use crate::core::{ConsolidationReport, MemoryCore};
pub use options::MemoryCoreOptions;
pub use types::{CsStats, EpmStats, MemoryCoreStats, PutResult, SearchHit};

pub use memcore_context::WorkingContext;
pub use memcore_core::errors::{MemCoreError, MemCoreResult};
pub use memcore_core::memory::{Importance, Record, RecordKind};
pub use memcore_core::outcome::{Degradation, Outcome};
