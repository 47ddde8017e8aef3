//! Cosine similarity and a brute-force `SimilarityIndex`.
//!
//! A linear scan is the right default for the populations a single
//! agent's cache reaches (tens of thousands of embeddings); swapping in
//! an approximate index later only requires a different `SimilarityIndex`
//! impl.

use dashmap::DashMap;
use memcore_core::traits::SimilarityIndex;

/// Returns 0.0 for zero-length, mismatched-length, or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Brute-force cosine-similarity index, keyed by record id.
pub struct BruteForceSimilarityIndex {
    vectors: DashMap<String, Vec<f32>>,
}

impl BruteForceSimilarityIndex {
    pub fn new() -> Self {
        Self {
            vectors: DashMap::new(),
        }
    }
}

impl Default for BruteForceSimilarityIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityIndex for BruteForceSimilarityIndex {
    fn insert(&self, id: &str, embedding: &[f32]) {
        self.vectors.insert(id.to_string(), embedding.to_vec());
    }

    fn remove(&self, id: &str) {
        self.vectors.remove(id);
    }

    fn query(&self, embedding: &[f32], k: usize, min_sim: f32) -> Vec<(String, f32)> {
        let mut scored: Vec<(String, f32)> = self
            .vectors
            .iter()
            .filter_map(|entry| {
                let sim = cosine_similarity(embedding, entry.value());
                (sim >= min_sim).then(|| (entry.key().clone(), sim))
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn mismatched_lengths_return_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn query_returns_top_k_above_threshold() {
        let index = BruteForceSimilarityIndex::new();
        index.insert("a", &[1.0, 0.0]);
        index.insert("b", &[0.9, 0.1]);
        index.insert("c", &[0.0, 1.0]);

        let results = index.query(&[1.0, 0.0], 2, 0.5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "a");
    }

    #[test]
    fn remove_excludes_from_future_queries() {
        let index = BruteForceSimilarityIndex::new();
        index.insert("a", &[1.0, 0.0]);
        index.remove("a");
        assert!(index.is_empty());
        assert!(index.query(&[1.0, 0.0], 5, 0.0).is_empty());
    }
}
