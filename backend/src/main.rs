mod auth;
mod config;
mod detection;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use auth::directory::{InMemoryDirectory, UserDirectory};
use config::RelayConfig;
use detection::hive::HiveClient;
use detection::service::DetectionService;
use detection::sightengine::SightengineClient;
use detection::video::PollingPolicy;
use routes::configure_routes;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = RelayConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let timeout = config.http.request_timeout();
    let content_api = SightengineClient::new(&config.credentials, &config.sightengine, timeout)
        .map_err(|e| std::io::Error::other(format!("Sightengine client: {}", e)))?;
    let audio_api = HiveClient::new(&config.credentials, &config.hive, timeout)
        .map_err(|e| std::io::Error::other(format!("Hive client: {}", e)))?;
    log::info!("Content detection provider: {:?}", content_api);
    log::info!("Audio detection provider: {:?}", audio_api);

    let policy = PollingPolicy::from(&config.polling);
    log::info!(
        "Video polling every {:?}, giving up after {:?}",
        policy.interval,
        policy.max_wait
    );

    let detection_service = DetectionService::new(Arc::new(content_api), Arc::new(audio_api), policy);
    let directory: Arc<dyn UserDirectory> = Arc::new(InMemoryDirectory::new());
    let directory = web::Data::from(directory);

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(detection_service.clone()))
            .app_data(directory.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
