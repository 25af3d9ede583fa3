// src/scatter/random_box.rs
//! Weighted selection over an ordered list of non-negative weights.

use rand::Rng;

/// Accumulates weights, then draws indices with probability proportional to
/// weight. Ties and float drift always resolve to a valid index: the scan
/// falls back to the last entry, and an all-zero list picks index 0.
#[derive(Clone, Debug, Default)]
pub struct RandomBox {
    weights: Vec<f32>,
    total: f32,
}

impl RandomBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.weights.clear();
        self.total = 0.0;
    }

    /// Register one weight. Negative input counts as zero.
    pub fn push_weight(&mut self, weight: f32) {
        let weight = weight.max(0.0);
        self.weights.push(weight);
        self.total += weight;
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Draw one index. Consumes exactly one value from `rng`.
    pub fn choose(&self, rng: &mut impl Rng) -> usize {
        if self.weights.is_empty() {
            return 0;
        }
        let mut remainder: f32 = rng.random_range(0.0..=self.total);
        for (index, weight) in self.weights.iter().enumerate() {
            remainder -= weight;
            if remainder <= 0.0 {
                return index;
            }
        }
        self.weights.len() - 1
    }
}
