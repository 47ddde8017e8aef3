use serde::{Deserialize, Serialize};

/// A temporally contiguous, semantically coherent run of records.
/// Produced by the Episodic Memory Manager's surprise-driven segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    /// Temporally ordered subsequence of admits.
    pub member_ids: Vec<String>,
    /// Nanoseconds since epoch of the first member's `created_at`.
    pub opened_at: i64,
    /// Nanoseconds since epoch of the closing admit, `None` while open.
    pub closed_at: Option<i64>,
    /// Exponentially weighted mean of member embeddings, or `None` if no
    /// member has ever had an embedding.
    pub centroid_embedding: Option<Vec<f32>>,
    /// Surprise value that would have closed the *previous* episode and
    /// opened this one (0.0 for the very first episode of a stream).
    pub surprise_at_open: f64,
    pub size_tokens: u32,
}

impl Episode {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    pub fn mean_importance(&self, importances: &[f64]) -> f64 {
        if importances.is_empty() {
            return 0.0;
        }
        importances.iter().sum::<f64>() / importances.len() as f64
    }
}
