//! Isolation Forest anomaly scoring.

use fastrand::Rng;

use crate::error::{Result, ScourError};
use crate::stats;

/// Euler–Mascheroni constant, used in the average path length estimate.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation tree node.
#[derive(Debug, Clone)]
enum IsolationTree {
    Internal {
        feature: usize,
        threshold: f64,
        /// Values < threshold.
        left: Box<IsolationTree>,
        /// Values >= threshold.
        right: Box<IsolationTree>,
    },
    External {
        size: usize,
    },
}

impl IsolationTree {
    fn build(
        x: &[Vec<f64>],
        indices: &[usize],
        height: usize,
        max_height: usize,
        rng: &mut Rng,
    ) -> Self {
        let n_samples = indices.len();
        if height >= max_height || n_samples <= 1 {
            return IsolationTree::External { size: n_samples };
        }

        // Split only on features that still vary within this subset.
        let varying: Vec<(usize, f64, f64)> = (0..x[0].len())
            .filter_map(|feature| {
                let (lo, hi) = indices
                    .iter()
                    .map(|&i| x[i][feature])
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                (hi - lo > 1e-10).then_some((feature, lo, hi))
            })
            .collect();

        if varying.is_empty() {
            return IsolationTree::External { size: n_samples };
        }

        let (feature, min_val, max_val) = varying[rng.usize(0..varying.len())];
        let threshold = min_val + rng.f64() * (max_val - min_val);

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| x[i][feature] < threshold);

        if left_indices.is_empty() || right_indices.is_empty() {
            return IsolationTree::External { size: n_samples };
        }

        let left = Box::new(Self::build(x, &left_indices, height + 1, max_height, rng));
        let right = Box::new(Self::build(x, &right_indices, height + 1, max_height, rng));

        IsolationTree::Internal {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn path_length(&self, sample: &[f64], current_height: usize) -> f64 {
        match self {
            IsolationTree::External { size } => current_height as f64 + average_path_length(*size),
            IsolationTree::Internal {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] < *threshold {
                    left.path_length(sample, current_height + 1)
                } else {
                    right.path_length(sample, current_height + 1)
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points:
/// c(n) = 2 H(n-1) - 2(n-1)/n.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n_f = n as f64;
            2.0 * ((n_f - 1.0).ln() + EULER_GAMMA) - 2.0 * (n_f - 1.0) / n_f
        }
    }
}

/// Unsupervised outlier detector over rows of numeric features.
///
/// Rows are flagged when their anomaly score is strictly above the
/// `1 - contamination` percentile of the training scores, so ties at the
/// threshold are never flagged and the flagged fraction is approximate.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: usize,
    contamination: f64,
    seed: u64,
    trees: Vec<IsolationTree>,
    sample_size: usize,
    threshold: Option<f64>,
}

impl IsolationForest {
    /// Create a forest with 100 trees, 256 samples per tree and seed 42.
    pub fn new(contamination: f64) -> Result<Self> {
        if !(contamination > 0.0 && contamination <= 0.5) {
            return Err(ScourError::InvalidParameter(format!(
                "contamination must be in (0, 0.5], got {}",
                contamination
            )));
        }

        Ok(Self {
            n_estimators: 100,
            max_samples: 256,
            contamination,
            seed: 42,
            trees: Vec::new(),
            sample_size: 0,
            threshold: None,
        })
    }

    /// Set number of trees.
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n.max(1);
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the trees and the flagging threshold from `x` (rows of equal
    /// width, no NaN).
    pub fn fit(&mut self, x: &[Vec<f64>]) -> Result<()> {
        let n_samples = x.len();
        if n_samples == 0 || x[0].is_empty() {
            return Err(ScourError::EmptyData("no rows to fit".to_string()));
        }

        let mut rng = Rng::with_seed(self.seed);
        let sample_size = self.max_samples.min(n_samples);
        let max_height = (sample_size.max(2) as f64).log2().ceil() as usize;

        let mut all: Vec<usize> = (0..n_samples).collect();
        self.trees = (0..self.n_estimators)
            .map(|_| {
                // Sample without replacement.
                rng.shuffle(&mut all);
                let indices = &all[..sample_size];
                IsolationTree::build(x, indices, 0, max_height, &mut rng)
            })
            .collect();
        self.sample_size = sample_size;

        let scores = self.score_samples(x)?;
        self.threshold = stats::percentile(&scores, 100.0 * (1.0 - self.contamination));

        Ok(())
    }

    /// Anomaly score per row, in (0, 1]; higher is more anomalous.
    pub fn score_samples(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(ScourError::InvalidParameter("model not fitted".to_string()));
        }

        let c_n = average_path_length(self.sample_size);
        if c_n == 0.0 {
            return Ok(vec![0.5; x.len()]);
        }

        Ok(x.iter()
            .map(|sample| {
                let avg_path: f64 = self
                    .trees
                    .iter()
                    .map(|tree| tree.path_length(sample, 0))
                    .sum::<f64>()
                    / self.trees.len() as f64;

                // s(x, n) = 2^(-E[h(x)] / c(n))
                2.0_f64.powf(-avg_path / c_n)
            })
            .collect())
    }

    /// Flag per row; `true` marks an outlier.
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<bool>> {
        let threshold = self.threshold.unwrap_or(f64::INFINITY);
        Ok(self
            .score_samples(x)?
            .into_iter()
            .map(|s| s > threshold)
            .collect())
    }

    /// Score threshold learned in `fit`.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }
}
