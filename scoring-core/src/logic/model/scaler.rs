//! Standard Scaler
//!
//! Per-feature zero mean, unit variance. Parameters are fit on the batch
//! being scored and never reused across calls.

use ndarray::{Array1, Array2, Axis};

/// Below this the feature is treated as constant and left unscaled
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

#[derive(Debug, Clone)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    /// Population standard deviation (ddof = 0), 1.0 for constant features
    pub scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: &Array2<f64>) -> Self {
        let cols = x.ncols();
        if x.nrows() == 0 {
            return Self {
                mean: Array1::zeros(cols),
                scale: Array1::ones(cols),
            };
        }

        let mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(cols));
        let scale = x
            .var_axis(Axis(0), 0.0)
            .mapv(|v| {
                let std = v.sqrt();
                if std < MIN_SCALE { 1.0 } else { std }
            });

        Self { mean, scale }
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.scale
    }

    pub fn fit_transform(x: &Array2<f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(x);
        let scaled = scaler.transform(x);
        (scaler, scaled)
    }
}
