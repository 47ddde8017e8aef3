use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights for the CMC retention score and the EPM episode-scoring lambda,
/// exposed as configuration since there's no single universally-correct
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight on raw importance in the retention score.
    pub w_i: f64,
    /// Weight on the recency-decay term.
    pub w_r: f64,
    /// Weight on `log(1 + access_count)`.
    pub w_a: f64,
    /// Penalty per compression level, discourages ping-pong re-promotion.
    pub w_c: f64,
    /// Blend between query-similarity and mean-importance in episode
    /// scoring, and between episodic and
    /// CMC-resident budget share in `build_context`.
    pub lambda_query: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            w_i: defaults::default_w_i(),
            w_r: defaults::default_w_r(),
            w_a: defaults::default_w_a(),
            w_c: defaults::default_w_c(),
            lambda_query: defaults::default_lambda_query(),
        }
    }
}
