//! Running-quantile tracker for the adaptive surprise threshold.

use std::collections::VecDeque;

/// Tracks recent non-boundary surprise values and reports a running
/// quantile, falling back to a bootstrap constant until enough samples
/// have accumulated.
pub struct AdaptiveQuantile {
    samples: VecDeque<f64>,
    capacity: usize,
    quantile: f64,
}

impl AdaptiveQuantile {
    pub fn new(quantile: f64, capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            quantile: quantile.clamp(0.0, 1.0),
        }
    }

    pub fn record(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Current threshold: the bootstrap value until `warmup_samples` have
    /// been recorded, then the tracked quantile of the recent window.
    pub fn threshold(&self, bootstrap: f64, warmup_samples: usize) -> f64 {
        if self.samples.len() < warmup_samples {
            return bootstrap;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idx = ((sorted.len() - 1) as f64 * self.quantile).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_bootstrap_below_warmup() {
        let mut q = AdaptiveQuantile::new(0.8, 100);
        q.record(0.9);
        assert_eq!(q.threshold(0.5, 10), 0.5);
    }

    #[test]
    fn switches_to_quantile_after_warmup() {
        let mut q = AdaptiveQuantile::new(0.8, 100);
        for v in 0..10 {
            q.record(v as f64 / 10.0);
        }
        let t = q.threshold(0.5, 10);
        assert!(t > 0.5);
    }

    #[test]
    fn capacity_evicts_oldest_samples() {
        let mut q = AdaptiveQuantile::new(0.5, 3);
        q.record(1.0);
        q.record(2.0);
        q.record(3.0);
        q.record(100.0);
        assert_eq!(q.sample_count(), 3);
    }
}
