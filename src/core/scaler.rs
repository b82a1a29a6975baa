use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scales with a magnitude below this are treated as constant features
const MIN_SCALE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalerError {
    #[error("Feature dimension mismatch: scaler expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Scaler mean has {mean} entries but scale has {scale}")]
    InconsistentParameters { mean: usize, scale: usize },
}

/// Standardizes features as `(x - mean) / scale` with parameters fixed at training time
///
/// `with_mean` and `with_std` mirror the training-side switches; both default to on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default = "default_true")]
    with_mean: bool,
    #[serde(default = "default_true")]
    with_std: bool,
}

fn default_true() -> bool {
    true
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalerError> {
        let scaler = Self {
            mean,
            scale,
            with_mean: true,
            with_std: true,
        };
        scaler.check()?;
        Ok(scaler)
    }

    /// Verify mean and scale describe the same number of features
    pub fn check(&self) -> Result<(), ScalerError> {
        if self.mean.len() != self.scale.len() {
            return Err(ScalerError::InconsistentParameters {
                mean: self.mean.len(),
                scale: self.scale.len(),
            });
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Standardize a single feature vector
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, ScalerError> {
        if x.len() != self.n_features() {
            return Err(ScalerError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.len(),
            });
        }

        let scaled = x
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&value, (&mean, &scale))| {
                let mut value = value;
                if self.with_mean {
                    value -= mean;
                }
                if self.with_std && scale.abs() > MIN_SCALE {
                    value /= scale;
                }
                value
            })
            .collect();

        Ok(scaled)
    }

    /// Standardize many rows, failing on the first malformed one
    pub fn transform_rows<'a, I>(&self, rows: I) -> Result<Vec<Vec<f64>>, ScalerError>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        rows.into_iter().map(|row| self.transform(row)).collect()
    }
}
