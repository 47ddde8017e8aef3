//! # memcore-tokens
//!
//! Token Estimator: a pure, deterministic, monotone-in-length
//! token counter wrapping `tiktoken-rs`'s `cl100k_base` encoding, with a
//! blake3-content-hash-keyed cache for repeat counts. Also implements the
//! admit-time truncation policy.

mod truncate;

use std::sync::OnceLock;

use memcore_core::traits::TokenEstimator;
use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

pub use truncate::{truncate_to_budget, TruncationResult};

fn bpe() -> &'static CoreBPE {
    static BPE: OnceLock<CoreBPE> = OnceLock::new();
    BPE.get_or_init(|| tiktoken_rs::cl100k_base().expect("cl100k_base ranks are bundled"))
}

/// Token counter with an optional content-hash-keyed cache.
///
/// `count` is always deterministic; `count_cached` additionally memoizes by
/// the blake3 hash of the input bytes, which only matters for performance
/// — correctness never depends on whether a count came from cache.
pub struct TokenCounter {
    cache: Cache<String, u32>,
}

impl TokenCounter {
    pub fn new(max_cache_entries: u64) -> Self {
        Self {
            cache: Cache::new(max_cache_entries),
        }
    }

    /// Count tokens in UTF-8 (lossy) content. Pure, deterministic, no I/O.
    pub fn count(&self, content: &[u8]) -> u32 {
        let text = String::from_utf8_lossy(content);
        bpe().encode_ordinary(&text).len() as u32
    }

    /// Same as `count`, but memoized by content hash.
    pub fn count_cached(&self, content: &[u8]) -> u32 {
        let key = blake3::hash(content).to_hex().to_string();
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }
        let count = self.count(content);
        self.cache.insert(key, count);
        count
    }

    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(50_000)
    }
}

impl TokenEstimator for TokenCounter {
    fn estimate(&self, content: &[u8]) -> u32 {
        self.count_cached(content)
    }
}
