//! Progressive compression policies. Monotonic: a record's
//! `compression_level` never decreases; `semantic` falls back to
//! `lossless` on capability failure and does not abort the admission or
//! eviction it was invoked from.

use memcore_core::memory::{CompressionPolicy, Record};
use memcore_core::traits::{Summarizer, TokenEstimator};

/// Outcome of compressing a record's cached representation one or more
/// levels further.
pub struct Compressed {
    pub content: Vec<u8>,
    pub tokens: u32,
    pub level: u32,
}

/// Compress `record` toward `policy`'s required level, starting from
/// `current_level` and `current_content` (the record's original content,
/// or a previously compressed representation on re-compression).
pub fn compress_toward(
    policy: CompressionPolicy,
    current_level: u32,
    current_content: &[u8],
    record: &Record,
    summarizer: &dyn Summarizer,
    estimator: &dyn TokenEstimator,
) -> Compressed {
    let target = policy.required_level();
    if target <= current_level {
        return Compressed {
            content: current_content.to_vec(),
            tokens: estimator.estimate(current_content),
            level: current_level,
        };
    }

    if target >= 2 {
        if let Some(summary) = summarizer.summarize(std::slice::from_ref(record)) {
            let tokens = estimator.estimate(&summary);
            return Compressed {
                content: summary,
                tokens,
                level: 2,
            };
        }
        // Summarization unavailable — degrade to lossless, never below
        // whatever level we already hold.
        if current_level >= 1 {
            return Compressed {
                content: current_content.to_vec(),
                tokens: estimator.estimate(current_content),
                level: current_level,
            };
        }
        return lossless(current_content, estimator);
    }

    lossless(current_content, estimator)
}

fn lossless(content: &[u8], estimator: &dyn TokenEstimator) -> Compressed {
    let compressed = zstd::bulk::compress(content, 3).unwrap_or_else(|_| content.to_vec());
    let original_tokens = estimator.estimate(content).max(1);
    let ratio = compressed.len() as f64 / content.len().max(1) as f64;
    let tokens = ((original_tokens as f64) * ratio).ceil().max(1.0) as u32;
    Compressed {
        content: compressed,
        tokens,
        level: 1,
    }
}
