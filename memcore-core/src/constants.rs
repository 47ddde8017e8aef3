/// memcore-core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-record token cap before truncation kicks in.
pub const DEFAULT_PER_RECORD_MAX_TOKENS: u32 = 2048;

/// Default number of CMC tiers when not configured explicitly.
pub const DEFAULT_TIER_COUNT: usize = 3;

/// Default number of most-recently-closed episodes CMC must never archive
/// records out of.
pub const DEFAULT_PIN_COUNT: usize = 2;

/// Default bootstrap surprise threshold before the adaptive quantile has
/// enough samples.
pub const DEFAULT_SURPRISE_THRESHOLD_BOOTSTRAP: f64 = 0.5;

/// Default adaptive quantile tracked for the surprise threshold.
pub const DEFAULT_ADAPTIVE_QUANTILE: f64 = 0.8;

/// Default maximum members per episode before it is force-closed.
pub const DEFAULT_MAX_EPISODE_MEMBERS: usize = 64;

/// Default maximum episode span in nanoseconds (1 hour).
pub const DEFAULT_MAX_EPISODE_SPAN_NANOS: i64 = 3_600_000_000_000;

/// Default episode size (tokens) above which a closed episode requests
/// summarization from the Consolidation Service.
pub const DEFAULT_SUMMARIZE_THRESHOLD_TOKENS: u32 = 512;

/// Default cosine-similarity threshold above which two records are
/// considered redundant during consolidation.
pub const DEFAULT_REDUNDANCY_THRESHOLD: f32 = 0.85;

/// Default importance below which consolidation prunes (archives) a record.
pub const DEFAULT_PRUNE_THRESHOLD: f64 = 0.2;

/// Default floor applied to a freshly created summary record's importance.
pub const DEFAULT_MIN_SUMMARY_IMPORTANCE: f64 = 0.4;

/// Small penalty applied per compression level in the retention score, to
/// discourage ping-pong re-promotion of already-compressed records.
pub const DEFAULT_COMPRESSION_PENALTY: f64 = 0.02;
