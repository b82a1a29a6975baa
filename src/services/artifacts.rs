use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::encoding::{encode_field, source_field, EncodeError, EncoderClasses, EncoderMap};
use crate::core::filters::distinct_states;
use crate::core::neighbors::{DistanceMetric, IndexError, NeighborParams};
use crate::core::scaler::{ScalerError, StandardScaler};
use crate::models::Destination;

/// Errors that can occur while loading the model bundle
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model bundle not found at '{0}'")]
    NotFound(PathBuf),

    #[error("Failed to read model bundle '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model bundle: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model bundle contains no destinations")]
    EmptyDataset,

    #[error("Model bundle lists no feature columns")]
    NoFeatures,

    #[error("Invalid scaler: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Scaler was fit on {scaler} features but the bundle lists {features}")]
    ScalerWidth { scaler: usize, features: usize },

    #[error("Invalid neighbor model parameters: {0}")]
    Neighbors(#[from] IndexError),

    #[error("Feature column '{0}' is neither numeric nor an encoded categorical column")]
    UnknownColumn(String),

    #[error("Row {row} ('{destination}') cannot be encoded: {source}")]
    Encode {
        row: usize,
        destination: String,
        #[source]
        source: EncodeError,
    },
}

/// On-disk model bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    #[serde(default)]
    pub model: Option<NeighborParams>,
    pub scaler: StandardScaler,
    #[serde(default)]
    pub encoders: EncoderMap,
    pub features: Vec<String>,
    #[serde(alias = "df")]
    pub destinations: Vec<Destination>,
}

/// Destination paired with its unscaled feature vector
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub destination: Destination,
    pub features: Vec<f64>,
}

/// Read-only view of a validated model bundle
///
/// Built once at startup and shared by every request.
#[derive(Debug)]
pub struct ArtifactStore {
    model_loaded: bool,
    metric: DistanceMetric,
    scaler: StandardScaler,
    encoders: EncoderMap,
    features: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl ArtifactStore {
    /// Load and validate a bundle file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle: ModelBundle = serde_json::from_slice(&bytes)?;

        tracing::debug!("Parsed model bundle from {}", path.display());

        Self::from_bundle(bundle)
    }

    /// Validate a bundle and precompute each row's feature vector
    pub fn from_bundle(bundle: ModelBundle) -> Result<Self, ArtifactError> {
        let ModelBundle {
            model,
            scaler,
            encoders,
            features,
            destinations,
        } = bundle;

        if features.is_empty() {
            return Err(ArtifactError::NoFeatures);
        }
        if destinations.is_empty() {
            return Err(ArtifactError::EmptyDataset);
        }

        scaler.check()?;
        if scaler.n_features() != features.len() {
            return Err(ArtifactError::ScalerWidth {
                scaler: scaler.n_features(),
                features: features.len(),
            });
        }

        let metric = match &model {
            Some(params) => params.distance_metric()?,
            None => DistanceMetric::Euclidean,
        };

        let rows = destinations
            .into_iter()
            .enumerate()
            .map(|(row, destination)| {
                let values = features
                    .iter()
                    .map(|column| resolve_feature(&destination, column, &encoders))
                    .collect::<Result<Vec<f64>, _>>()
                    .map_err(|err| match err {
                        FeatureError::UnknownColumn(column) => ArtifactError::UnknownColumn(column),
                        FeatureError::Encode(source) => ArtifactError::Encode {
                            row,
                            destination: destination.name.clone(),
                            source,
                        },
                    })?;
                Ok(FeatureRow {
                    destination,
                    features: values,
                })
            })
            .collect::<Result<Vec<_>, ArtifactError>>()?;

        Ok(Self {
            model_loaded: model.is_some(),
            metric,
            scaler,
            encoders,
            features,
            rows,
        })
    }

    /// Whether the bundle carried neighbor model parameters
    pub fn model_loaded(&self) -> bool {
        self.model_loaded
    }

    /// Metric used for request-time neighbor indexes
    pub fn distance_metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoders(&self) -> &EncoderMap {
        &self.encoders
    }

    /// Feature column names in training order
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.rows.iter().map(|row| &row.destination)
    }

    /// Known classes of every encoder, in bundle order
    pub fn encoder_classes(&self) -> EncoderClasses<'_> {
        EncoderClasses(&self.encoders)
    }

    /// Sorted distinct states, optionally for one country
    pub fn states(&self, country: Option<&str>) -> Vec<String> {
        distinct_states(self.destinations(), country)
    }
}

enum FeatureError {
    UnknownColumn(String),
    Encode(EncodeError),
}

fn resolve_feature(
    destination: &Destination,
    column: &str,
    encoders: &EncoderMap,
) -> Result<f64, FeatureError> {
    if let Some(value) = destination.numeric(column) {
        return Ok(value);
    }

    let field = source_field(column).ok_or_else(|| FeatureError::UnknownColumn(column.to_string()))?;
    let value = destination
        .categorical(field)
        .ok_or_else(|| FeatureError::UnknownColumn(column.to_string()))?;

    encode_field(encoders, field, value)
        .map(|code| code as f64)
        .map_err(FeatureError::Encode)
}
