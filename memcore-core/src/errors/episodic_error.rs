/// Episodic Memory Manager errors.
#[derive(Debug, thiserror::Error)]
pub enum EpisodicError {
    #[error("no open episode to append to")]
    NoOpenEpisode,

    #[error("episode {id} already closed")]
    AlreadyClosed { id: String },

    #[error("episode configuration invalid: {reason}")]
    InvalidConfig { reason: String },
}
