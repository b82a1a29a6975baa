use actix_web::{http::StatusCode, web, HttpResponse, Responder, ResponseError};
use std::sync::Arc;
use validator::Validate;

use crate::core::{EncodeError, RecommendError, Recommender};
use crate::models::{ErrorResponse, HealthResponse, PredictRequest, StatesQuery};
use crate::services::ArtifactStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub recommender: Recommender,
    pub default_top_k: usize,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/encoders", web::get().to(get_encoders))
        .route("/states", web::get().to(get_states))
        .route("/predict", web::post().to(predict));
}

impl RecommendError {
    fn kind(&self) -> &'static str {
        match self {
            RecommendError::InvalidInput(_) => "invalid_input",
            RecommendError::Encode(EncodeError::UnknownCategory { .. }) => "unknown_category",
            RecommendError::Encode(_) => "configuration_error",
            RecommendError::NoMatches => "not_found",
            RecommendError::FeatureMismatch(_) => "feature_mismatch",
            RecommendError::Scaling(_) => "scaling_error",
            RecommendError::Index(_) => "knn_error",
        }
    }
}

impl ResponseError for RecommendError {
    fn status_code(&self) -> StatusCode {
        match self {
            RecommendError::InvalidInput(_)
            | RecommendError::Encode(EncodeError::UnknownCategory { .. })
            | RecommendError::FeatureMismatch(_) => StatusCode::BAD_REQUEST,
            RecommendError::NoMatches => StatusCode::NOT_FOUND,
            RecommendError::Encode(_)
            | RecommendError::Scaling(_)
            | RecommendError::Index(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            detail: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.store.model_loaded(),
        features: state.store.features().to_vec(),
    })
}

/// Known classes of every categorical encoder
///
/// GET /encoders
async fn get_encoders(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.store.encoder_classes())
}

/// Distinct states, optionally for one country
///
/// GET /states?country={country}
async fn get_states(
    state: web::Data<AppState>,
    query: web::Query<StatesQuery>,
) -> impl Responder {
    let states = state.store.states(query.country.as_deref());
    HttpResponse::Ok().json(states)
}

/// Recommend destinations endpoint
///
/// POST /predict
///
/// Request body:
/// ```json
/// {
///   "Location": "India",
///   "State": "Goa",
///   "Climate": "Tropical",
///   "BudgetLevel": "Medium",
///   "AvgCostINR": 25000,
///   "PopularityScore": 70,
///   "AvgTempC": 28,
///   "Rating": 4.5,
///   "SafetyIndex": 7.5,
///   "Accessibility": "Easy",
///   "TransportCostINR": 4000,
///   "top_k": 10
/// }
/// ```
async fn predict(
    state: web::Data<AppState>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, RecommendError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for predict request: {}", errors);
        return Err(RecommendError::InvalidInput(errors.to_string()));
    }

    let query = req.into_inner().into_query(state.default_top_k);

    tracing::info!(
        "Recommending for location: {}, state: {:?}, top_k: {}",
        query.location,
        query.state,
        query.top_k
    );

    let result = match state.recommender.recommend(&state.store, &query) {
        Ok(result) => result,
        Err(e) if e.status_code().is_server_error() => {
            tracing::error!("Recommendation failed: {}", e);
            return Err(e);
        }
        Err(e) => {
            tracing::info!("Recommendation rejected: {}", e);
            return Err(e);
        }
    };

    tracing::info!(
        "Returning {} recommendations (from {} candidates)",
        result.recommendations.len(),
        result.filtered_candidates
    );

    Ok(HttpResponse::Ok().json(result.recommendations))
}
