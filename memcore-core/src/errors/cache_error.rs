/// Cascading Memory Cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("record rejected: importance {importance} below coldest threshold {coldest_threshold}")]
    Rejected { importance: f64, coldest_threshold: f64 },

    #[error("metadata rollback after failed commit for {id}: {reason}")]
    RolledBack { id: String, reason: String },

    #[error("compression failed for {id}, degraded to {fallback}")]
    CompressionDegraded { id: String, fallback: String },

    #[error("tier configuration invalid: {reason}")]
    InvalidTierConfig { reason: String },
}
