use std::collections::HashMap;
use thiserror::Error;

use crate::core::{
    encoding::{encode_field, encoded_column, EncodeError},
    filters::matches_location,
    neighbors::{IndexError, NeighborIndex},
    scaler::ScalerError,
};
use crate::models::{LocationPolicy, Recommendation, RecommendationQuery};
use crate::services::ArtifactStore;

/// Errors raised by the recommendation pipeline
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("No matching destinations found after filtering.")]
    NoMatches,

    #[error("Feature columns mismatch: '{0}' cannot be built from the request")]
    FeatureMismatch(String),

    #[error("Scaling error: {0}")]
    Scaling(#[from] ScalerError),

    #[error("KNN error: {0}")]
    Index(#[from] IndexError),
}

/// Result of the recommendation process
#[derive(Debug)]
pub struct RecommendResult {
    pub recommendations: Vec<Recommendation>,
    /// Rows that survived the location filter
    pub filtered_candidates: usize,
}

/// Request-time recommendation pipeline
///
/// # Pipeline Stages
/// 1. Coarse location filter
/// 2. Categorical encoding of the query
/// 3. Scaling of query and candidates
/// 4. Ephemeral neighbor index over the candidates
/// 5. Projection of the nearest rows
#[derive(Debug, Clone)]
pub struct Recommender {
    policy: LocationPolicy,
}

impl Recommender {
    pub fn new(policy: LocationPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: LocationPolicy::default(),
        }
    }

    pub fn policy(&self) -> &LocationPolicy {
        &self.policy
    }

    /// Find the destinations nearest to `query` among those passing the location filter
    ///
    /// Returns `min(query.top_k, filtered rows)` recommendations, nearest first.
    pub fn recommend(
        &self,
        store: &ArtifactStore,
        query: &RecommendationQuery,
    ) -> Result<RecommendResult, RecommendError> {
        if query.top_k == 0 {
            return Err(RecommendError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }

        // Stage 1: location filter
        let candidates: Vec<_> = store
            .rows()
            .iter()
            .filter(|row| {
                matches_location(
                    &row.destination,
                    &query.location,
                    query.state.as_deref(),
                    &self.policy,
                )
            })
            .collect();

        if candidates.is_empty() {
            return Err(RecommendError::NoMatches);
        }

        // Stage 2 & 3: encode and scale the query
        let input = self.query_features(store, query)?;
        let scaled_input = store.scaler().transform(&input)?;

        let scaled_candidates = store
            .scaler()
            .transform_rows(candidates.iter().map(|row| row.features.as_slice()))?;

        // Stage 4: neighbor search over the filtered subset
        let n_neighbors = query.top_k.min(candidates.len());
        let index = NeighborIndex::fit(scaled_candidates, n_neighbors, store.distance_metric())?;
        let neighbors = index.kneighbors(&scaled_input)?;

        // Stage 5: projection in rank order
        let recommendations = neighbors
            .iter()
            .map(|neighbor| Recommendation::from(&candidates[neighbor.index].destination))
            .collect();

        Ok(RecommendResult {
            recommendations,
            filtered_candidates: candidates.len(),
        })
    }

    /// Assemble the unscaled query vector in the bundle's feature order
    fn query_features(
        &self,
        store: &ArtifactStore,
        query: &RecommendationQuery,
    ) -> Result<Vec<f64>, RecommendError> {
        let encoders = store.encoders();

        let climate = encode_field(encoders, "Climate", &query.climate)?;
        let budget_level = encode_field(encoders, "BudgetLevel", &query.budget_level)?;
        let accessibility = encode_field(encoders, "Accessibility", &query.accessibility)?;

        let values: HashMap<String, f64> = [
            (encoded_column("Climate"), climate as f64),
            (encoded_column("BudgetLevel"), budget_level as f64),
            ("AvgCostINR".to_string(), query.avg_cost_inr),
            ("PopularityScore".to_string(), query.popularity_score),
            ("AvgTempC".to_string(), query.avg_temp_c),
            ("Rating".to_string(), query.rating),
            ("SafetyIndex".to_string(), query.safety_index),
            (encoded_column("Accessibility"), accessibility as f64),
            ("TransportCostINR".to_string(), query.transport_cost_inr),
        ]
        .into_iter()
        .collect();

        store
            .features()
            .iter()
            .map(|column| {
                values
                    .get(column)
                    .copied()
                    .ok_or_else(|| RecommendError::FeatureMismatch(column.clone()))
            })
            .collect()
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_policy()
    }
}
