/// Memory Store persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("id collision on put: {id}")]
    IdCollision { id: String },

    #[error("metadata patch rejected for {id}: {reason}")]
    PatchRejected { id: String, reason: String },

    #[error("log append failed: {reason}")]
    AppendFailed { reason: String },

    #[error("snapshot write failed: {reason}")]
    SnapshotFailed { reason: String },

    #[error("restore failed: {reason}")]
    RestoreFailed { reason: String },

    #[error("parameters manifest mismatch: expected {expected}, found {found}")]
    ManifestMismatch { expected: String, found: String },

    #[error("integrity check failed during recovery: {details}")]
    IntegrityCheckFailed { details: String },
}
