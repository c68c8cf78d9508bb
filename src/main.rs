use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use sports_academy_api::data::database::{AcademyDatabase, CatalogSeed};
use sports_academy_api::infrastructure::config::AppConfig;
use sports_academy_api::infrastructure::logging::init_logging;
use sports_academy_api::infrastructure::payment_gateway::StripeGateway;
use sports_academy_api::presentation::handlers::AppState;
use sports_academy_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use sports_academy_api::presentation::routes::configure;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    info!("Logging initialized successfully");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let database = AcademyDatabase::open();
    if let Some(path) = &config.catalog_seed_path {
        let seed = CatalogSeed::from_file(path).map_err(|e| {
            error!(error = %e, "Failed to load catalog seed");
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        database.seed_catalog(seed).await.map_err(|e| {
            error!(error = %e, "Failed to seed catalog");
            std::io::Error::other(e.to_string())
        })?;
    }
    let gateway = Arc::new(StripeGateway::new(&config.payment));

    let state = web::Data::new(AppState::new(
        &database,
        config.jwt_secret.clone(),
        gateway,
        config.payment.currency.clone(),
    ));
    info!("Application state initialized");

    let auth_service = state.auth_service.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(auth_service.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Cors::permissive())
            .configure(configure)
    });

    let bind_addr = (config.host, config.port);
    let server = server.bind(bind_addr)?;
    info!(
        host = %config.host,
        port = config.port,
        "SPORTS ACADEMY SERVER IS RUNNING"
    );
    server.run().await
}
