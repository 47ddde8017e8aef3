//! TF-IDF sparse-to-dense embedding provider.
//!
//! Generates fixed-dimension vectors from term frequency–inverse document
//! frequency scores. Deterministic and dependency-free — always available,
//! so it is a reasonable default `EmbeddingProvider` when no model-backed
//! provider is injected.

use std::collections::HashMap;

use memcore_core::traits::EmbeddingProvider;

pub struct TfIdfProvider {
    dimensions: usize,
}

impl TfIdfProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn tfidf_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() || self.dimensions == 0 {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in &tf {
            let freq = count / total;
            // Shorter terms are more likely stopwords; penalize them.
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dimensions);
            vec[bucket] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl EmbeddingProvider for TfIdfProvider {
    fn embed(&self, content: &[u8]) -> Option<Vec<f32>> {
        let text = std::str::from_utf8(content).ok()?;
        Some(self.tfidf_vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "tfidf-fallback"
    }

    fn is_available(&self) -> bool {
        self.dimensions > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_returns_zero_vector() {
        let p = TfIdfProvider::new(128);
        let v = p.embed(b"").unwrap();
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn produces_correct_dimensions() {
        let p = TfIdfProvider::new(384);
        let v = p.embed(b"hello world test embedding").unwrap();
        assert_eq!(v.len(), 384);
    }

    #[test]
    fn identical_text_is_deterministic() {
        let p = TfIdfProvider::new(64);
        let a = p.embed(b"the quick brown fox").unwrap();
        let b = p.embed(b"the quick brown fox").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_utf8_content_returns_none() {
        let p = TfIdfProvider::new(64);
        assert!(p.embed(&[0xff, 0xfe, 0xfd]).is_none());
    }

    #[test]
    fn zero_dimensions_is_unavailable() {
        let p = TfIdfProvider::new(0);
        assert!(!p.is_available());
    }
}
