/// Result of `episodic_context`.
#[derive(Debug, Clone, Default)]
pub struct EpisodicContext {
    pub episodes: Vec<String>,
    /// Member ids, grouped by selected episode, each group in original
    /// temporal order.
    pub records: Vec<String>,
    pub estimated_tokens: u32,
}

/// Outcome of `on_record`, reported so callers
/// (the Context Builder, Consolidation Service triggers) can react to
/// segmentation boundaries without re-deriving them.
#[derive(Debug, Clone)]
pub struct OnRecordOutcome {
    pub episode_id: String,
    /// True if this record opened a new episode (the previous one closed
    /// or there was none yet).
    pub boundary: bool,
    /// Set if closing the previous episode crossed `summarize_threshold`
    /// and a consolidation request was queued for it.
    pub closed_episode_id: Option<String>,
}
