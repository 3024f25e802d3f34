//! Isolation Forest
//!
//! Ensemble of random isolation trees. Rows that get isolated in fewer
//! splits score higher. The decision threshold is the `1 - contamination`
//! quantile of the training scores, so a fit flags roughly
//! `contamination * n` rows.
//!
//! Trees are built in parallel; every tree draws from its own RNG seeded
//! from the master seed, so results do not depend on scheduling.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::constants::{DEFAULT_CONTAMINATION, DEFAULT_ESTIMATORS, DEFAULT_RANDOM_SEED, IFOREST_MAX_SAMPLES};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone)]
pub struct IsolationParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_ESTIMATORS,
            max_samples: IFOREST_MAX_SAMPLES,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_RANDOM_SEED,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
    threshold: f64,
}

impl IsolationForest {
    pub fn fit(x: &Array2<f64>, params: &IsolationParams) -> Self {
        let n = x.nrows();
        let sample_size = params.max_samples.min(n).max(1);
        let height_limit = (sample_size.max(2) as f64).log2().ceil() as usize;

        let mut master = StdRng::seed_from_u64(params.seed);
        let tree_seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();

        let trees = tree_seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let rows = if n == 0 {
                    Vec::new()
                } else {
                    index::sample(&mut rng, n, sample_size).into_vec()
                };
                build_tree(x, rows, 0, height_limit, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            threshold: f64::INFINITY,
        };

        let scores = forest.score_samples(x);
        forest.threshold = quantile(&scores, 1.0 - params.contamination);

        log::debug!(
            "Isolation forest: {} trees, subsample {}, threshold {:.4}",
            forest.trees.len(),
            sample_size,
            forest.threshold
        );

        forest
    }

    /// Anomaly score per row, in (0, 1]. Higher is more anomalous.
    pub fn score_samples(&self, x: &Array2<f64>) -> Vec<f64> {
        (0..x.nrows())
            .into_par_iter()
            .map(|i| self.score_row(x.row(i)))
            .collect()
    }

    /// True for rows scoring strictly above the fitted threshold
    pub fn predict(&self, x: &Array2<f64>) -> Vec<bool> {
        self.score_samples(x)
            .into_iter()
            .map(|s| s > self.threshold)
            .collect()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn score_row(&self, row: ArrayView1<f64>) -> f64 {
        let norm = average_path_length(self.sample_size);
        if self.trees.is_empty() || norm <= 0.0 {
            return 0.5;
        }

        // Sequential sum keeps the float result independent of thread count
        let total: f64 = self.trees.iter().map(|t| path_length(t, row, 0)).sum();
        let mean = total / self.trees.len() as f64;

        2f64.powf(-mean / norm)
    }
}

fn build_tree(
    x: &Array2<f64>,
    rows: Vec<usize>,
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= height_limit || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    // Only features with spread inside this node can split it
    let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
        .filter_map(|feature| {
            let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                let v = x[[r, feature]];
                (lo.min(v), hi.max(v))
            });
            (max > min).then_some((feature, min, max))
        })
        .collect();

    if candidates.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let value = rng.gen_range(min..max);

    let (left, right): (Vec<usize>, Vec<usize>) = rows.into_iter().partition(|&r| x[[r, feature]] <= value);

    Node::Split {
        feature,
        value,
        left: Box::new(build_tree(x, left, depth + 1, height_limit, rng)),
        right: Box::new(build_tree(x, right, depth + 1, height_limit, rng)),
    }
}

fn path_length(node: &Node, row: ArrayView1<f64>, depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split { feature, value, left, right } => {
            if row[*feature] <= *value {
                path_length(left, row, depth + 1)
            } else {
                path_length(right, row, depth + 1)
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolation quantile, `q` in [0, 1]
pub(crate) fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::INFINITY;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
