// Route exports
pub mod recommend;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::config::CorsSettings;
use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(recommend::configure);
}

/// JSON error body for rejected payloads and query strings
#[derive(Debug)]
pub struct PayloadError {
    error: &'static str,
    detail: String,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.detail)
    }
}

impl std::error::Error for PayloadError {}

impl error::ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: self.error.to_string(),
            detail: self.detail.clone(),
            status_code: StatusCode::BAD_REQUEST.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    PayloadError {
        error: "invalid_json",
        detail: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> error::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    PayloadError {
        error: "invalid_query",
        detail: format!("Invalid query: {}", err),
    }
    .into()
}

/// CORS policy for browser front-ends
///
/// A `*` entry allows any origin; otherwise only the listed origins are
/// allowed, with credentials.
pub fn build_cors(settings: &CorsSettings) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if settings.allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    settings
        .allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
        .supports_credentials()
}
