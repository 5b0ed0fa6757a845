use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use triptreat_api::{
    db::{self, Cache, PgClickStore, PgHotelStore, PgRestaurantStore},
    routes::{cors_layer, create_router, AppState},
    services::TripAdvisorSource,
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    if config.tripadvisor_api_key.is_none() {
        tracing::warn!("TRIPADVISOR_API_KEY not set, ingestion endpoints will fail");
    }

    let listing_source = TripAdvisorSource::new(
        cache,
        config.tripadvisor_api_key.clone(),
        config.tripadvisor_api_url.clone(),
        config.tripadvisor_api_host.clone(),
    )?;

    let state = Arc::new(AppState {
        clicks: Arc::new(PgClickStore::new(pool.clone())),
        hotels: Arc::new(PgHotelStore::new(pool.clone())),
        restaurants: Arc::new(PgRestaurantStore::new(pool)),
        listing_source: Arc::new(listing_source),
    });

    let app = create_router(state).layer(cors_layer(&config.cors_origins)?);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
