//! Central Configuration Constants
//!
//! Single source of truth for scoring defaults.
//! To change a model default, only edit this file.

/// Expected fraction of anomalous rows in a batch
pub const DEFAULT_CONTAMINATION: f64 = 0.10;

/// Isolation forest ensemble size
pub const DEFAULT_ESTIMATORS: usize = 100;

/// Number of behavioral groups
pub const DEFAULT_CLUSTER_COUNT: usize = 4;

/// Seed shared by both sub-models
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Minimum complete rows required to fit
pub const DEFAULT_MIN_ROWS: usize = 10;

/// Points added to the composite score of an anomalous row.
/// Policy constant, not derived from the detector's continuous score.
pub const ANOMALY_BONUS: f64 = 5.0;

/// Isolation forest subsample ceiling (per tree)
pub const IFOREST_MAX_SAMPLES: usize = 256;

/// K-means restarts with different seeds; best inertia wins
pub const KMEANS_N_INIT: usize = 10;

/// K-means Lloyd iteration cap per restart
pub const KMEANS_MAX_ITER: usize = 300;

/// K-means convergence tolerance (squared centroid shift)
pub const KMEANS_TOLERANCE: f64 = 1e-4;

/// Cluster label for rows that never entered the fitted batch
pub const UNSCORED_CLUSTER: i32 = -1;

/// Default size of the "top priorities" table
pub const DEFAULT_TOP_N: usize = 50;

/// Crate version
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
