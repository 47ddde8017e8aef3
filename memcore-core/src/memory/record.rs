use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::importance::Importance;

/// Closed set of record kinds. Adding a variant is an API change —
/// every match over `RecordKind` in this workspace is exhaustive by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Conversation,
    Code,
    Concept,
    Reasoning,
    Fact,
    Reference,
    Summary,
    Merged,
    Reflection,
    System,
}

impl RecordKind {
    /// Kinds consolidation is forbidden from merging, to preserve
    /// provenance clarity.
    pub fn is_merge_exempt(self) -> bool {
        matches!(self, RecordKind::Summary | RecordKind::Reflection)
    }

    /// Kinds that are never pruned regardless of importance.
    pub fn is_prune_exempt(self) -> bool {
        matches!(self, RecordKind::Summary | RecordKind::Reflection)
    }
}

/// A memory record. Immutable once admitted except for the
/// metadata fields `importance`, `access_count`, `last_access_at`, `tags`,
/// and `compression_level`, which `MemoryStore::update_metadata` may patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Content-addressed id: blake3 of canonical content bytes + `created_at`.
    pub id: String,
    /// Opaque payload. Truncated to `per_record_max_tokens` at admit time.
    pub content: Vec<u8>,
    pub kind: RecordKind,
    /// Monotonic timestamp, nanoseconds since epoch.
    pub created_at: i64,
    /// Token count, from the injected Token Estimator. Never exceeds
    /// the configured per-record maximum.
    pub tokens: u32,
    /// L2-normalized embedding, absent if the provider was unavailable
    /// at admit time.
    pub embedding: Option<Vec<f32>>,
    pub importance: Importance,
    pub access_count: u64,
    /// Nanoseconds since epoch of the last retrieval hit.
    pub last_access_at: i64,
    pub tags: BTreeSet<String>,
    /// Parent ids. Empty for ingested records, non-empty for
    /// merged/summary/reflection records.
    pub provenance: BTreeSet<String>,
    /// Non-decreasing over the record's lifetime.
    /// 0 = original content, see `memcore_cache::CompressionPolicy`.
    pub compression_level: u32,
    /// Set by `MemoryStore::archive`; `get` still resolves archived records.
    pub archived: bool,
    /// Set when admit-time truncation shortened the content.
    pub truncated: bool,
    /// Token count before truncation, if `truncated`.
    pub original_tokens: Option<u32>,
}

impl Record {
    /// Compute the content-addressed id for a (content, created_at) pair.
    pub fn compute_id(content: &[u8], created_at: i64) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(content);
        hasher.update(&created_at.to_le_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// Build a freshly ingested record (provenance empty, compression_level 0,
    /// archived false). Callers from the consolidation pipeline construct
    /// merged/summary records directly since they carry non-empty provenance.
    #[allow(clippy::too_many_arguments)]
    pub fn new_ingested(
        content: Vec<u8>,
        kind: RecordKind,
        created_at: i64,
        tokens: u32,
        embedding: Option<Vec<f32>>,
        importance: Importance,
        tags: BTreeSet<String>,
        truncated: bool,
        original_tokens: Option<u32>,
    ) -> Self {
        let id = Self::compute_id(&content, created_at);
        Self {
            id,
            content,
            kind,
            created_at,
            tokens,
            embedding,
            importance,
            access_count: 0,
            last_access_at: created_at,
            tags,
            provenance: BTreeSet::new(),
            compression_level: 0,
            archived: false,
            truncated,
            original_tokens,
        }
    }

    pub fn content_as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
