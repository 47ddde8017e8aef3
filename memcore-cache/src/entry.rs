//! Per-record bookkeeping held by a resident tier.

/// A resident record's cache-local state. `tokens`/`compression_level`
/// diverge from the Memory Store's copy once the record is compressed —
/// the store's `content`/`tokens` stay immutable post-admit;
/// only the compressed representation cached here shrinks.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub id: String,
    pub importance: f64,
    pub tokens: u32,
    pub access_count: u64,
    pub last_access_at: i64,
    pub compression_level: u32,
    /// Set by the Episodic Memory Manager; blocks removal past the
    /// coldest tier.
    pub pinned: bool,
    /// Present once a compression policy has replaced the record's
    /// working representation. Re-promotion reuses this form.
    pub compressed_content: Option<Vec<u8>>,
}

impl CacheEntry {
    pub fn new(id: String, importance: f64, tokens: u32, created_at: i64) -> Self {
        Self {
            id,
            importance,
            tokens,
            access_count: 0,
            last_access_at: created_at,
            compression_level: 0,
            pinned: false,
            compressed_content: None,
        }
    }
}
