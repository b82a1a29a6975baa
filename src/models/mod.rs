// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Destination, Recommendation, RecommendationQuery, LocationPolicy, MISSING_STATE};
pub use requests::{PredictRequest, StatesQuery};
pub use responses::{HealthResponse, ErrorResponse};
