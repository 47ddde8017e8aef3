use serde::{Deserialize, Serialize};

use super::defaults;

/// Concurrency/backpressure configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Bounded queue depth between "log appended" and "EPM/CMC updated".
    pub ingest_queue_capacity: usize,
    /// When the queue is full: `true` returns `Busy` instead of blocking.
    pub nonblocking: bool,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            ingest_queue_capacity: defaults::default_ingest_queue_capacity(),
            nonblocking: false,
        }
    }
}
