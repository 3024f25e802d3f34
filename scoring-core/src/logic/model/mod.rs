//! Model Module - Unsupervised models behind the risk score
//!
//! All three are fit from scratch on every batch; nothing is persisted.
//! - `scaler` - per-batch standardization
//! - `isolation` - isolation forest outlier detector
//! - `kmeans` - behavioral grouping

pub mod scaler;
pub mod isolation;
pub mod kmeans;

pub use scaler::StandardScaler;
pub use isolation::{IsolationForest, IsolationParams};
pub use kmeans::{KMeans, KMeansParams};
