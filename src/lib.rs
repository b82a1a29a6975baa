//! Tourist Recommender - nearest-neighbor travel destination recommendations
//!
//! This library loads a pre-trained model bundle and serves recommendations
//! through a filter, encode, scale and neighbor-search pipeline.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Recommender, RecommendError, LabelEncoder, StandardScaler, NeighborIndex};
pub use models::{Destination, Recommendation, RecommendationQuery, PredictRequest, LocationPolicy};
pub use services::{ArtifactStore, ArtifactError, ModelBundle};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let recommender = Recommender::default();
        assert_eq!(recommender.policy().home_country, "India");
    }
}
