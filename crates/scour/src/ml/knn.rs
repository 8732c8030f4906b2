//! K-nearest-neighbour imputation over a dense feature matrix.
//!
//! Missing entries are `NaN`. Distances ignore coordinates missing on either
//! side and are scaled up by the share of coordinates that were usable, so
//! rows with fewer shared features are not treated as closer.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// Ordered (distance, row) pair for the neighbour heap.
#[derive(Debug, Clone, Copy)]
struct DistanceIdx(f64, usize);

impl PartialEq for DistanceIdx {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DistanceIdx {}

impl PartialOrd for DistanceIdx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistanceIdx {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max heap by distance; equal distances prefer the earlier row.
        self.0
            .partial_cmp(&other.0)
            .unwrap_or(Ordering::Equal)
            .then(self.1.cmp(&other.1))
    }
}

/// How neighbour values are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weights {
    /// Plain mean.
    #[default]
    Uniform,
    /// Inverse-distance weighted mean.
    Distance,
}

/// Fills each missing entry from the `k` nearest rows that have that feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnImputer {
    n_neighbors: usize,
    weights: Weights,
}

impl KnnImputer {
    /// Create a uniform-weight imputer over `n_neighbors` neighbours.
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors: n_neighbors.max(1),
            weights: Weights::Uniform,
        }
    }

    /// Set weighting scheme.
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Return a copy of `x` with every `NaN` replaced.
    ///
    /// Neighbours are taken from the input as given, so imputed values never
    /// feed later imputations. A feature with no donor rows at all stays
    /// `NaN`; one whose donors are all out of reach gets the feature mean.
    pub fn fit_transform(&self, x: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let n_features = x.first().map_or(0, Vec::len);
        let means = feature_means(x, n_features);
        let mut out = x.to_vec();

        for (r, row) in x.iter().enumerate() {
            if !row.iter().any(|v| v.is_nan()) {
                continue;
            }

            let distances: Vec<f64> = x
                .iter()
                .enumerate()
                .map(|(d, other)| {
                    if d == r {
                        f64::INFINITY
                    } else {
                        nan_euclidean(row, other)
                    }
                })
                .collect();

            for feature in (0..n_features).filter(|&j| row[j].is_nan()) {
                let neighbours = self.nearest(x, &distances, feature);
                out[r][feature] = if neighbours.is_empty() {
                    means[feature]
                } else {
                    self.average(x, &neighbours, feature)
                };
            }
        }

        out
    }

    /// The `k` closest rows with `feature` present, as (row, distance).
    fn nearest(&self, x: &[Vec<f64>], distances: &[f64], feature: usize) -> Vec<(usize, f64)> {
        let mut heap: BinaryHeap<DistanceIdx> = BinaryHeap::with_capacity(self.n_neighbors + 1);

        for (d, &dist) in distances.iter().enumerate() {
            if !dist.is_finite() || x[d][feature].is_nan() {
                continue;
            }
            let candidate = DistanceIdx(dist, d);
            if heap.len() < self.n_neighbors {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|DistanceIdx(d, i)| (i, d))
            .collect()
    }

    fn average(&self, x: &[Vec<f64>], neighbours: &[(usize, f64)], feature: usize) -> f64 {
        match self.weights {
            Weights::Uniform => {
                neighbours.iter().map(|&(i, _)| x[i][feature]).sum::<f64>()
                    / neighbours.len() as f64
            }
            Weights::Distance => {
                // An exact match dominates everything else.
                let exact: Vec<f64> = neighbours
                    .iter()
                    .filter(|&&(_, d)| d < 1e-10)
                    .map(|&(i, _)| x[i][feature])
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().sum::<f64>() / exact.len() as f64;
                }

                let (weighted, total) = neighbours.iter().fold((0.0, 0.0), |(ws, wt), &(i, d)| {
                    let w = 1.0 / d;
                    (ws + x[i][feature] * w, wt + w)
                });
                weighted / total
            }
        }
    }
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Euclidean distance over coordinates present in both rows, scaled by
/// `n_features / n_present`. Infinite when nothing is shared.
pub fn nan_euclidean(a: &[f64], b: &[f64]) -> f64 {
    let mut present = 0usize;
    let mut accum = 0.0;

    for (&ai, &bi) in a.iter().zip(b) {
        if ai.is_nan() || bi.is_nan() {
            continue;
        }
        present += 1;
        accum += (ai - bi) * (ai - bi);
    }

    if present == 0 {
        return f64::INFINITY;
    }

    (a.len() as f64 / present as f64 * accum).sqrt()
}

fn feature_means(x: &[Vec<f64>], n_features: usize) -> Vec<f64> {
    (0..n_features)
        .map(|j| {
            let present: Vec<f64> = x.iter().map(|r| r[j]).filter(|v| !v.is_nan()).collect();
            crate::stats::mean(&present).unwrap_or(f64::NAN)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_nan_euclidean_scales_by_present() {
        let d = nan_euclidean(&[1.0, NAN, 3.0], &[2.0, 5.0, 3.0]);
        // sqrt(3/2 * 1)
        assert!((d - 1.5_f64.sqrt()).abs() < 1e-12);
        assert!(nan_euclidean(&[NAN], &[1.0]).is_infinite());
    }

    #[test]
    fn test_uses_nearest_rows() {
        let x = vec![
            vec![1.0, 10.0],
            vec![1.1, 12.0],
            vec![100.0, 500.0],
            vec![1.05, NAN],
        ];
        let out = KnnImputer::new(2).fit_transform(&x);
        assert!((out[3][1] - 11.0).abs() < 1e-12);
        assert_eq!(out[0], x[0]);
    }

    #[test]
    fn test_fewer_donors_than_k() {
        let x = vec![vec![1.0, 4.0], vec![2.0, NAN], vec![3.0, NAN]];
        let out = KnnImputer::new(5).fit_transform(&x);
        assert_eq!(out[1][1], 4.0);
        assert_eq!(out[2][1], 4.0);
    }

    #[test]
    fn test_no_shared_features_falls_back_to_mean() {
        let x = vec![vec![NAN, 2.0], vec![NAN, 4.0], vec![7.0, NAN]];
        let out = KnnImputer::new(5).fit_transform(&x);
        assert_eq!(out[2][1], 3.0);
        // No row has feature 0 to learn from besides row 2 itself.
        assert_eq!(out[0][0], 7.0);
    }

    #[test]
    fn test_distance_weights_favor_close_rows() {
        let x = vec![vec![0.0, 0.0], vec![1.0, 10.0], vec![0.1, NAN]];
        let uniform = KnnImputer::new(2).fit_transform(&x);
        let weighted = KnnImputer::new(2)
            .with_weights(Weights::Distance)
            .fit_transform(&x);
        assert_eq!(uniform[2][1], 5.0);
        assert!(weighted[2][1] < 5.0);
    }
}
