use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tourist_recommender::config::{LoggingSettings, Settings};
use tourist_recommender::routes::{self, recommend::AppState};
use tourist_recommender::{ArtifactStore, Recommender};

fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.compact().init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting tourist recommender service...");

    // Load the model bundle; the service does not start without it
    let bundle_path = &settings.model.bundle_path;
    let store = ArtifactStore::load(bundle_path).map_err(|e| {
        error!("Failed to load model bundle: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;

    info!(
        "Model bundle loaded from {} ({} destinations, {} features, {} encoders)",
        bundle_path.display(),
        store.rows().len(),
        store.features().len(),
        store.encoders().len()
    );

    let recommender = Recommender::new(settings.recommend.location_policy());

    info!("Recommender initialized with policy: {:?}", recommender.policy());

    // Build application state
    let app_state = AppState {
        store: Arc::new(store),
        recommender,
        default_top_k: settings.recommend.default_top_k,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let cors_settings = settings.cors.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .wrap(routes::build_cors(&cors_settings))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    });

    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    server.bind((host, port))?.run().await
}
