use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use cinechronic_api::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle, PgStore},
    routes::{create_router, AppState},
    services::{
        AuthService, CatalogApi, GeminiClient, RecommendationSettings, TextGenerator, TmdbClient,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database ready");

    let (cache, cache_handle) = connect_cache(&config).await;

    let mut state = AppState::new(
        Arc::new(PgStore::new(pool)),
        AuthService::from_config(&config)?,
    )
    .with_cache(cache)
    .with_watch_region(config.watch_region.clone());

    match TmdbClient::from_config(&config) {
        Ok(client) => {
            let catalog: Arc<dyn CatalogApi> = Arc::new(client);
            let generator = config
                .gemini_api_key
                .as_deref()
                .filter(|key| !key.trim().is_empty())
                .map(|key| {
                    Arc::new(GeminiClient::new(
                        config.gemini_api_url.clone(),
                        key,
                        config.gemini_model.clone(),
                    )) as Arc<dyn TextGenerator>
                });
            if generator.is_none() {
                tracing::warn!("GEMINI_API_KEY not set, recommendations use heuristic copy");
            }

            let settings = RecommendationSettings::from_config(&config)?;
            tracing::info!(
                strategy = ?settings.strategy,
                min_movies = settings.min_movies,
                "Recommendation engine configured"
            );
            state = state.with_catalog(catalog, generator, settings);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Catalog routes and recommendations are disabled");
        }
    }

    let app = create_router(Arc::new(state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Redis-backed cache when `REDIS_URL` is set, a disabled cache otherwise
async fn connect_cache(config: &Config) -> (Cache, Option<CacheWriterHandle>) {
    let Some(url) = config.redis_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        tracing::info!("REDIS_URL not set, director lookups are not cached");
        return (Cache::disabled(), None);
    };

    match create_redis_client(url) {
        Ok(client) => {
            let (cache, handle) = Cache::new(client).await;
            tracing::info!("Redis cache enabled");
            (cache, Some(handle))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid REDIS_URL, caching disabled");
            (Cache::disabled(), None)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
