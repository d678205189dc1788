//! Prices API - price resolution REST server

use axum_helpers::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_resilience::CircuitBreaker;
use domain_prices::handlers::ApiDoc;
use domain_prices::{
    InMemoryPriceRepository, PgPriceRepository, PriceService, ResilientPriceRepository, handlers,
};
use tracing::{info, warn};

mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let breaker = CircuitBreaker::new("price-store", config.breaker.clone());

    let api_routes = match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL price store");
            let db = sea_orm::Database::connect(url.as_str()).await?;
            let repository = ResilientPriceRepository::new(PgPriceRepository::new(db), breaker);
            handlers::router(PriceService::new(repository))
        }
        None => {
            warn!("DATABASE_URL not set, serving the in-memory sample price list");
            let repository =
                ResilientPriceRepository::new(InMemoryPriceRepository::with_sample_data(), breaker);
            handlers::router(PriceService::new(repository))
        }
    };

    let router = create_router::<ApiDoc>(api_routes).merge(health_router());

    info!("Starting Prices API on port {}", config.server.port);
    create_app(router, &config.server).await?;

    info!("Prices API shutdown complete");
    Ok(())
}
