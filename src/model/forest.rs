//! Isolation forest: random axis-aligned partitioning; short isolation paths mean outliers.
//!
//! Scores follow the usual convention: `score_samples` is the negated anomaly score
//! (closer to -1 = more anomalous), `decision_function` shifts it by the fit-time
//! contamination offset so negative values are outliers.

use crate::config::ForestConfig;
use crate::error::{GuardError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Label for points whose decision value is negative.
pub const OUTLIER: i32 = -1;
pub const INLIER: i32 = 1;

/// Average path length of an unsuccessful BST search over `n` points.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

/// One randomized tree, stored as a flat node arena (root at index 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(x: &ArrayView2<f64>, rows: Vec<usize>, max_depth: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(x, rows, 0, max_depth, rng);
        tree
    }

    fn build(
        &mut self,
        x: &ArrayView2<f64>,
        rows: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: rows.len() });
        if rows.len() <= 1 || depth >= max_depth {
            return id;
        }

        // (feature, min, max) for features that still vary inside this node
        let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
            .filter_map(|f| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                    let v = x[[r, f]];
                    (lo.min(v), hi.max(v))
                });
                (hi > lo).then_some((f, lo, hi))
            })
            .collect();
        if candidates.is_empty() {
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let mut threshold = rng.gen_range(lo..hi);
        if threshold >= hi {
            threshold = lo;
        }

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| x[[r, feature]] <= threshold);
        let left = self.build(x, left_rows, depth + 1, max_depth, rng);
        let right = self.build(x, right_rows, depth + 1, max_depth, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Edges walked to reach a leaf, plus the expected remaining depth for the leaf's size.
    pub fn path_length(&self, sample: ArrayView1<f64>) -> f64 {
        let mut node = 0;
        let mut depth = 0usize;
        loop {
            match &self.nodes[node] {
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold { *left } else { *right };
                    depth += 1;
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    /// Rows drawn per tree at fit time
    max_samples: usize,
    n_features: usize,
    /// Training-score percentile at `contamination`
    offset: f64,
    contamination: f64,
    seed: u64,
}

impl IsolationForest {
    /// Fit on `x` (rows = samples). Deterministic for a given `config.seed`.
    pub fn fit(x: ArrayView2<f64>, config: &ForestConfig) -> Result<Self> {
        config.validate()?;
        let n = x.nrows();
        if n == 0 {
            return Err(GuardError::EmptyTrainingSet);
        }

        let psi = config.max_samples.min(n);
        let max_depth = (psi.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators)
            .map(|_| {
                let rows = rand::seq::index::sample(&mut rng, n, psi).into_vec();
                IsolationTree::grow(&x, rows, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            max_samples: psi,
            n_features: x.ncols(),
            offset: 0.0,
            contamination: config.contamination,
            seed: config.seed,
        };
        let train_scores = forest.score_samples(x)?;
        forest.offset = percentile(train_scores.to_vec(), 100.0 * config.contamination);
        Ok(forest)
    }

    /// Negated anomaly score per row, in [-1, 0).
    pub fn score_samples(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(GuardError::InvalidParameter(format!(
                "expected {} feature columns, got {}",
                self.n_features,
                x.ncols()
            )));
        }
        let norm = average_path_length(self.max_samples);
        let scores = x
            .axis_iter(Axis(0))
            .map(|row| {
                let mean_depth = self
                    .trees
                    .iter()
                    .map(|t| t.path_length(row))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                if norm > 0.0 {
                    -(2f64.powf(-mean_depth / norm))
                } else {
                    // single-sample fit: every point isolates immediately
                    -1.0
                }
            })
            .collect();
        Ok(scores)
    }

    /// Higher is more normal; negative means outlier.
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        Ok(self.score_samples(x)? - self.offset)
    }

    /// [`OUTLIER`] or [`INLIER`] per row.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<i32>> {
        Ok(self
            .decision_function(x)?
            .mapv(|d| if d < 0.0 { OUTLIER } else { INLIER }))
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }
}

/// Linear-interpolation percentile (`q` in [0, 100]) of a non-empty sample.
fn percentile(mut values: Vec<f64>, q: f64) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let rank = (q / 100.0).clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn cluster_with_outliers() -> Array2<f64> {
        let mut rows = Vec::new();
        for i in 0..95 {
            let jitter = (i % 7) as f64 * 0.01;
            rows.extend_from_slice(&[0.05 + jitter, 0.0, 0.0]);
        }
        for i in 0..5 {
            rows.extend_from_slice(&[1.5 + i as f64 * 0.3, 0.4, 1.0]);
        }
        Array2::from_shape_vec((100, 3), rows).unwrap()
    }

    #[test]
    fn average_path_length_small_cases() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        let c256 = average_path_length(256);
        assert!((c256 - 10.24).abs() < 0.01);
    }

    #[test]
    fn percentile_interpolates() {
        assert_eq!(percentile(vec![4.0, 1.0, 3.0, 2.0], 0.0), 1.0);
        assert_eq!(percentile(vec![4.0, 1.0, 3.0, 2.0], 100.0), 4.0);
        assert!((percentile(vec![1.0, 2.0, 3.0, 4.0, 5.0], 20.0) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn outliers_score_lower_than_inliers() {
        let x = cluster_with_outliers();
        let forest = IsolationForest::fit(x.view(), &ForestConfig::default()).unwrap();
        let probe = array![[0.08, 0.0, 0.0], [3.0, 0.5, 1.0]];
        let d = forest.decision_function(probe.view()).unwrap();
        assert!(d[0] > d[1]);
        let labels = forest.predict(probe.view()).unwrap();
        assert_eq!(labels[0], INLIER);
        assert_eq!(labels[1], OUTLIER);
    }

    #[test]
    fn contamination_sets_training_outlier_share() {
        let x = cluster_with_outliers();
        let forest = IsolationForest::fit(x.view(), &ForestConfig::default()).unwrap();
        let flagged = forest
            .predict(x.view())
            .unwrap()
            .iter()
            .filter(|&&l| l == OUTLIER)
            .count();
        // ties in the dense cluster can only pull the share down
        assert!(flagged >= 5 && flagged <= 20, "flagged {}", flagged);
    }

    #[test]
    fn same_seed_same_forest() {
        let x = cluster_with_outliers();
        let cfg = ForestConfig {
            n_estimators: 25,
            ..ForestConfig::default()
        };
        let a = IsolationForest::fit(x.view(), &cfg).unwrap();
        let b = IsolationForest::fit(x.view(), &cfg).unwrap();
        assert_eq!(a, b);
        let other = ForestConfig { seed: 7, ..cfg };
        let c = IsolationForest::fit(x.view(), &other).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn subsample_caps_tree_size() {
        let x = cluster_with_outliers();
        let cfg = ForestConfig {
            n_estimators: 10,
            max_samples: 16,
            ..ForestConfig::default()
        };
        let forest = IsolationForest::fit(x.view(), &cfg).unwrap();
        assert_eq!(forest.max_samples(), 16);
        assert_eq!(forest.n_estimators(), 10);
        // a full binary tree over 16 points has at most 31 nodes
        assert!(forest.trees.iter().all(|t| t.node_count() <= 31));
    }

    #[test]
    fn rejects_empty_and_wrong_width() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            IsolationForest::fit(empty.view(), &ForestConfig::default()),
            Err(GuardError::EmptyTrainingSet)
        ));
        let x = cluster_with_outliers();
        let forest = IsolationForest::fit(x.view(), &ForestConfig::default()).unwrap();
        let narrow = array![[0.1, 0.2]];
        assert!(forest.score_samples(narrow.view()).is_err());
    }

    #[test]
    fn constant_data_yields_single_leaf_trees() {
        let x = Array2::<f64>::zeros((50, 3));
        let forest = IsolationForest::fit(x.view(), &ForestConfig::default()).unwrap();
        assert!(forest.trees.iter().all(|t| t.node_count() == 1));
        let d = forest.decision_function(x.view()).unwrap();
        assert!(d.iter().all(|v| v.abs() < 1e-12));
    }
}
