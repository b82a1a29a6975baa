use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("Expected n_neighbors > 0, got {0}")]
    InvalidNeighborCount(usize),

    #[error("Expected n_neighbors <= n_samples, but n_samples = {n_samples}, n_neighbors = {n_neighbors}")]
    TooManyNeighbors { n_neighbors: usize, n_samples: usize },

    #[error("Cannot build an index over zero samples")]
    Empty,

    #[error("Point {row} has {actual} features, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Minkowski p must be >= 1, got {0}")]
    InvalidMinkowskiPower(f64),
}

/// Distance metric between feature vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceMetric {
    /// `sqrt(sum((x_i - y_i)^2))`
    Euclidean,
    /// `sum(|x_i - y_i|)`
    Manhattan,
    /// `sum(|x_i - y_i|^p)^(1/p)`
    Minkowski(f64),
}

impl DistanceMetric {
    #[inline]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let pairs = a.iter().zip(b);
        match *self {
            DistanceMetric::Euclidean => pairs.map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt(),
            DistanceMetric::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Minkowski(p) => pairs
                .map(|(x, y)| (x - y).abs().powf(p))
                .sum::<f64>()
                .powf(1.0 / p),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricName {
    #[default]
    Minkowski,
    #[serde(alias = "l2")]
    Euclidean,
    #[serde(alias = "l1", alias = "cityblock")]
    Manhattan,
}

/// Parameters of the neighbor model stored in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborParams {
    #[serde(default = "default_n_neighbors")]
    pub n_neighbors: usize,
    #[serde(default)]
    pub metric: MetricName,
    #[serde(default = "default_p")]
    pub p: f64,
}

fn default_n_neighbors() -> usize { 5 }
fn default_p() -> f64 { 2.0 }

impl Default for NeighborParams {
    fn default() -> Self {
        Self {
            n_neighbors: default_n_neighbors(),
            metric: MetricName::default(),
            p: default_p(),
        }
    }
}

impl NeighborParams {
    /// Resolve the configured metric, collapsing Minkowski p=1/p=2 to their named forms
    pub fn distance_metric(&self) -> Result<DistanceMetric, IndexError> {
        match self.metric {
            MetricName::Euclidean => Ok(DistanceMetric::Euclidean),
            MetricName::Manhattan => Ok(DistanceMetric::Manhattan),
            MetricName::Minkowski => {
                if !(self.p >= 1.0) || !self.p.is_finite() {
                    Err(IndexError::InvalidMinkowskiPower(self.p))
                } else if self.p == 1.0 {
                    Ok(DistanceMetric::Manhattan)
                } else if self.p == 2.0 {
                    Ok(DistanceMetric::Euclidean)
                } else {
                    Ok(DistanceMetric::Minkowski(self.p))
                }
            }
        }
    }
}

/// A neighbor of a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the point in the indexed set
    pub index: usize,
    pub distance: f64,
}

/// Exact brute-force neighbor index over a fixed set of points
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    points: Vec<Vec<f64>>,
    n_neighbors: usize,
    metric: DistanceMetric,
}

impl NeighborIndex {
    /// Build an index answering `n_neighbors` nearest points per query
    pub fn fit(
        points: Vec<Vec<f64>>,
        n_neighbors: usize,
        metric: DistanceMetric,
    ) -> Result<Self, IndexError> {
        if n_neighbors == 0 {
            return Err(IndexError::InvalidNeighborCount(n_neighbors));
        }
        let Some(first) = points.first() else {
            return Err(IndexError::Empty);
        };
        if n_neighbors > points.len() {
            return Err(IndexError::TooManyNeighbors {
                n_neighbors,
                n_samples: points.len(),
            });
        }

        let expected = first.len();
        if let Some((row, point)) = points.iter().enumerate().find(|(_, p)| p.len() != expected) {
            return Err(IndexError::DimensionMismatch {
                row,
                expected,
                actual: point.len(),
            });
        }

        Ok(Self {
            points,
            n_neighbors,
            metric,
        })
    }

    /// Nearest points to `query`, closest first
    ///
    /// Equal distances keep insertion order.
    pub fn kneighbors(&self, query: &[f64]) -> Result<Vec<Neighbor>, IndexError> {
        let expected = self.points[0].len();
        if query.len() != expected {
            return Err(IndexError::DimensionMismatch {
                row: 0,
                expected,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .points
            .iter()
            .enumerate()
            .map(|(index, point)| Neighbor {
                index,
                distance: self.metric.distance(query, point),
            })
            .collect();

        // Stable sort keeps ties in insertion order
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(self.n_neighbors);

        Ok(neighbors)
    }
}
