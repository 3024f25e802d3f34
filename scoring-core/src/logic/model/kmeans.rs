//! K-Means clustering
//!
//! k-means++ seeding, Lloyd iterations, `n_init` restarts (best inertia
//! wins). Empty clusters are refilled with the worst-fit point of a
//! multi-member cluster, so with at least `k` rows every label is used.

use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::constants::{
    DEFAULT_CLUSTER_COUNT, DEFAULT_RANDOM_SEED, KMEANS_MAX_ITER, KMEANS_N_INIT, KMEANS_TOLERANCE,
};

#[derive(Debug, Clone)]
pub struct KMeansParams {
    pub n_clusters: usize,
    pub n_init: usize,
    pub max_iter: usize,
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            n_clusters: DEFAULT_CLUSTER_COUNT,
            n_init: KMEANS_N_INIT,
            max_iter: KMEANS_MAX_ITER,
            tolerance: KMEANS_TOLERANCE,
            seed: DEFAULT_RANDOM_SEED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KMeans {
    pub centroids: Array2<f64>,
    /// Cluster per input row, in [0, n_clusters)
    pub labels: Vec<usize>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
    pub n_iter: usize,
}

impl KMeans {
    /// Fit on `x`. Callers guarantee `1 <= n_clusters <= x.nrows()`.
    pub fn fit(x: &Array2<f64>, params: &KMeansParams) -> Self {
        let k = params.n_clusters.max(1).min(x.nrows().max(1));

        // Absolute tolerance relative to the data's mean variance
        let tol = if x.nrows() > 0 {
            params.tolerance * x.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0)
        } else {
            0.0
        };

        let mut master = StdRng::seed_from_u64(params.seed);
        let run_seeds: Vec<u64> = (0..params.n_init.max(1)).map(|_| master.gen()).collect();

        let runs: Vec<KMeans> = run_seeds
            .par_iter()
            .map(|&seed| run_once(x, k, params.max_iter, tol, &mut StdRng::seed_from_u64(seed)))
            .collect();

        // First run wins ties so the pick does not depend on scheduling
        let mut best: Option<KMeans> = None;
        for run in runs {
            match &best {
                Some(b) if run.inertia >= b.inertia => {}
                _ => best = Some(run),
            }
        }

        let best = best.unwrap_or_else(|| Self {
            centroids: Array2::zeros((0, x.ncols())),
            labels: Vec::new(),
            inertia: 0.0,
            n_iter: 0,
        });

        log::debug!(
            "K-means: k={}, inertia {:.4} after {} iterations",
            k,
            best.inertia,
            best.n_iter
        );

        best
    }

    /// Members per cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.nrows()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

fn run_once(x: &Array2<f64>, k: usize, max_iter: usize, tol: f64, rng: &mut StdRng) -> KMeans {
    let n = x.nrows();
    if n == 0 {
        return KMeans {
            centroids: Array2::zeros((0, x.ncols())),
            labels: Vec::new(),
            inertia: 0.0,
            n_iter: 0,
        };
    }

    let mut centroids = kmeans_plus_plus(x, k, rng);
    let mut n_iter = 0;

    for iter in 0..max_iter {
        n_iter = iter + 1;
        let mut labels = assign(x, &centroids);
        repair_empty(x, &mut labels, &centroids, k);

        let updated = recompute_centroids(x, &labels, k);
        let shift: f64 = centroids
            .rows()
            .into_iter()
            .zip(updated.rows())
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = updated;

        if shift <= tol {
            break;
        }
    }

    // Labels consistent with the final centroids
    let mut labels = assign(x, &centroids);
    repair_empty(x, &mut labels, &centroids, k);
    let centroids = recompute_centroids(x, &labels, k);

    let inertia = labels
        .iter()
        .enumerate()
        .map(|(i, &c)| squared_distance(x.row(i), centroids.row(c)))
        .sum();

    KMeans {
        centroids,
        labels,
        inertia,
        n_iter,
    }
}

/// D² sampling: each next centroid drawn proportional to squared distance
/// from the nearest centroid already chosen
fn kmeans_plus_plus(x: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n = x.nrows();
    let mut chosen = Vec::with_capacity(k);
    chosen.push(rng.gen_range(0..n));

    let mut nearest: Vec<f64> = (0..n)
        .map(|i| squared_distance(x.row(i), x.row(chosen[0])))
        .collect();

    while chosen.len() < k {
        let total: f64 = nearest.iter().sum();
        let next = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            let mut pick = n - 1;
            for (i, d) in nearest.iter().enumerate() {
                acc += d;
                if acc >= target && *d > 0.0 {
                    pick = i;
                    break;
                }
            }
            pick
        } else {
            rng.gen_range(0..n)
        };

        chosen.push(next);
        for (i, d) in nearest.iter_mut().enumerate() {
            *d = d.min(squared_distance(x.row(i), x.row(next)));
        }
    }

    x.select(Axis(0), &chosen)
}

/// Nearest centroid per row; lowest index wins ties
fn assign(x: &Array2<f64>, centroids: &Array2<f64>) -> Vec<usize> {
    x.rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (c, centroid) in centroids.rows().into_iter().enumerate() {
                let d = squared_distance(row, centroid);
                if d < best_dist {
                    best = c;
                    best_dist = d;
                }
            }
            best
        })
        .collect()
}

/// Move the worst-fit point of a multi-member cluster into each empty cluster
fn repair_empty(x: &Array2<f64>, labels: &mut [usize], centroids: &Array2<f64>, k: usize) {
    let mut sizes = vec![0usize; k];
    for &l in labels.iter() {
        sizes[l] += 1;
    }

    for empty in 0..k {
        if sizes[empty] > 0 {
            continue;
        }

        let donor = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| sizes[l] > 1)
            .map(|(i, &l)| (i, squared_distance(x.row(i), centroids.row(l))))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if d <= bd => best,
                _ => Some((i, d)),
            });

        if let Some((i, _)) = donor {
            sizes[labels[i]] -= 1;
            labels[i] = empty;
            sizes[empty] = 1;
        }
    }
}

/// Mean of members per cluster; a cluster with no members keeps a zero row
fn recompute_centroids(x: &Array2<f64>, labels: &[usize], k: usize) -> Array2<f64> {
    let mut sums = Array2::<f64>::zeros((k, x.ncols()));
    let mut counts = vec![0usize; k];

    for (i, &l) in labels.iter().enumerate() {
        let mut row = sums.row_mut(l);
        row += &x.row(i);
        counts[l] += 1;
    }

    for (c, count) in counts.iter().enumerate() {
        if *count > 0 {
            sums.row_mut(c).mapv_inplace(|v| v / *count as f64);
        }
    }

    sums
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
