/// Consolidation Service errors.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidationError {
    #[error("consolidation already in progress")]
    AlreadyRunning,

    #[error("merge failed for component {component:?}: {reason}")]
    MergeFailed { component: Vec<String>, reason: String },

    #[error("provenance closure violated: {id} references missing parent {parent}")]
    ProvenanceDangling { id: String, parent: String },

    #[error("deadline exceeded during phase {phase}")]
    DeadlineExceeded { phase: String },
}
