mod cache_error;
mod consolidation_error;
mod context_error;
mod episodic_error;
mod store_error;

pub use cache_error::CacheError;
pub use consolidation_error::ConsolidationError;
pub use context_error::ContextError;
pub use episodic_error::EpisodicError;
pub use store_error::StoreError;

/// The unified error type returned by every public memcore operation.
/// Subsystem errors convert in via `#[from]` so callers can `?` through
/// crate boundaries without manual wrapping.
#[derive(Debug, thiserror::Error)]
pub enum MemCoreError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("conflict: {reason}")]
    Conflict { reason: String },

    #[error("record not found: {id}")]
    NotFound { id: String },

    #[error("operation timed out after deadline")]
    Timeout,

    #[error("busy: queue capacity exceeded")]
    Busy,

    #[error("capability unavailable: {capability} ({reason})")]
    CapabilityUnavailable { capability: String, reason: String },

    #[error("corrupt persisted state: {details}")]
    Corrupt { details: String },

    #[error("internal invariant violated: {invariant}")]
    Internal { invariant: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Episodic(#[from] EpisodicError),

    #[error(transparent)]
    Consolidation(#[from] ConsolidationError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

pub type MemCoreResult<T> = Result<T, MemCoreError>;

impl MemCoreError {
    /// Whether a caller may retry this operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MemCoreError::Timeout | MemCoreError::Busy)
    }

    /// Whether this error should abort the caller's operation, as opposed
    /// to being absorbed into a degradation report.
    pub fn aborts_caller(&self) -> bool {
        matches!(
            self,
            MemCoreError::InvalidArgument { .. }
                | MemCoreError::Conflict { .. }
                | MemCoreError::Timeout
                | MemCoreError::Busy
                | MemCoreError::Corrupt { .. }
                | MemCoreError::Internal { .. }
        )
    }
}
