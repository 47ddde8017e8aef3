use serde::{Deserialize, Serialize};

/// A reported fallback when an injected capability was unavailable or
/// failed; never an error on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Degradation {
    pub capability: String,
    pub reason: String,
}

impl Degradation {
    pub fn new(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            reason: reason.into(),
        }
    }
}

/// Result of `CascadingMemoryCache::admit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AdmitOutcome {
    /// Admitted to `tier`, demoting `evicted` other records in the process.
    Admitted { tier: usize, evicted: Vec<String> },
    /// Importance was below every tier's threshold; the record stays in
    /// the Memory Store only.
    Rejected,
}

/// Structured outcome wrapper every public memcore operation returns:
/// the primary result, any degradations encountered, and a monotonic
/// logical-time marker usable to correlate with `stats()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub result: T,
    pub degradations: Vec<Degradation>,
    pub logical_time: u64,
}

impl<T> Outcome<T> {
    pub fn ok(result: T, logical_time: u64) -> Self {
        Self {
            result,
            degradations: Vec::new(),
            logical_time,
        }
    }

    pub fn degraded(result: T, degradations: Vec<Degradation>, logical_time: u64) -> Self {
        Self {
            result,
            degradations,
            logical_time,
        }
    }
}
