//! # memcore-embeddings
//!
//! Default implementations of the `EmbeddingProvider` and `SimilarityIndex`
//! capabilities: a dependency-free TF-IDF fallback
//! provider and a brute-force cosine-similarity index suitable for the
//! population sizes a single agent's memory store reaches.

pub mod providers;
pub mod similarity;

pub use providers::TfIdfProvider;
pub use similarity::{cosine_similarity, BruteForceSimilarityIndex};
