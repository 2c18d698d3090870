//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! `auth` and `community` routers.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::store::RefreshTokenRepository;
use auth::{PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    routing::get,
};
use community::{PgCommunityRepository, community_router};
use platform::cache::ReadThroughCache;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,community=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: drop expired refresh tokens
    // Errors here should not prevent server startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    match auth_store_for_cleanup.cleanup_expired().await {
        Ok(tokens) => {
            tracing::info!(tokens_deleted = tokens, "Refresh token cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Refresh token cleanup failed, continuing anyway"
            );
        }
    }

    // Cache: Redis when configured, otherwise process-local
    let cache = match &config.redis_url {
        Some(url) => match ReadThroughCache::redis(url, config.cache_ttl).await {
            Ok(cache) => {
                tracing::info!("Connected to Redis");
                cache
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, using in-memory cache");
                ReadThroughCache::in_memory(config.cache_ttl)
            }
        },
        None => {
            tracing::info!("REDIS_URL not set, using in-memory cache");
            ReadThroughCache::in_memory(config.cache_ttl)
        }
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let auth_config = Arc::new(config.auth.clone());
    let community_config = Arc::new(config.community());

    // Build router
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest(
            "/auth",
            auth_router(PgAuthRepository::new(pool.clone()), auth_config.clone()),
        )
        .merge(community_router(
            PgAuthRepository::new(pool.clone()),
            PgCommunityRepository::new(pool),
            cache,
            community_config,
            auth_config,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
