//! Capability traits for the pluggable pieces a `MemoryCore` needs. Each
//! capability is a small trait; callers may inject a concrete
//! implementation or a no-op default that degrades gracefully.

use crate::memory::Record;

/// Pure, deterministic, monotone-in-length token counter.
/// No network access; implementations may wrap a model-specific tokenizer
/// or a cheaper approximation, but must be deterministic for a given input.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, content: &[u8]) -> u32;
}

/// Embedding generation capability. Failure is non-fatal:
/// `embed` returning `None` means the record is admitted without an
/// embedding and similarity search skips it.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, content: &[u8]) -> Option<Vec<f32>>;
    fn embed_batch(&self, contents: &[Vec<u8>]) -> Vec<Option<Vec<f32>>> {
        contents.iter().map(|c| self.embed(c)).collect()
    }
    /// Fixed for the process lifetime.
    fn dimensions(&self) -> usize;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
}

/// Approximate nearest-neighbor structure over admitted embeddings.
/// May be a brute-force scan for small populations.
pub trait SimilarityIndex: Send + Sync {
    fn insert(&self, id: &str, embedding: &[f32]);
    fn remove(&self, id: &str);
    /// Top-k by cosine similarity, `sim >= min_sim`, possibly approximate.
    fn query(&self, embedding: &[f32], k: usize, min_sim: f32) -> Vec<(String, f32)>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summarization capability used by Consolidation Service phase 4 and by
/// Episodic Memory Manager's consolidation-request hook.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, records: &[Record]) -> Option<Vec<u8>>;
}

/// Merge-synthesis capability used by Consolidation Service phase 3.
/// Optional; defaults to "pick representative" when absent.
pub trait SynthesizeMerge: Send + Sync {
    fn synthesize(&self, records: &[Record]) -> Option<Vec<u8>>;
}

/// Injectable clock, nanoseconds since epoch, for deterministic tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// `Clock` backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(i64::MAX)
    }
}

/// `EmbeddingProvider` that is always unavailable. Used when no capability
/// is injected; every admit degrades gracefully.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEmbeddingProvider;

impl EmbeddingProvider for NoopEmbeddingProvider {
    fn embed(&self, _content: &[u8]) -> Option<Vec<f32>> {
        None
    }
    fn dimensions(&self) -> usize {
        0
    }
    fn name(&self) -> &str {
        "noop"
    }
    fn is_available(&self) -> bool {
        false
    }
}

/// `Summarizer`/`SynthesizeMerge` that always declines, so those phases
/// skip without error.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSummarizer;

impl Summarizer for NoopSummarizer {
    fn summarize(&self, _records: &[Record]) -> Option<Vec<u8>> {
        None
    }
}

impl SynthesizeMerge for NoopSummarizer {
    fn synthesize(&self, _records: &[Record]) -> Option<Vec<u8>> {
        None
    }
}
