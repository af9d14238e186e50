use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sweepstar_web::api::BookingApi;
use sweepstar_web::cache::{start_cache_warmer, AppCache};
use sweepstar_web::config::Config;
use sweepstar_web::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweepstar_web=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        booking_api = %config.booking_api_url,
        min_factor = %config.policy.min_factor,
        max_factor = %config.policy.max_factor,
        "Configuration loaded"
    );

    let api = BookingApi::new(&config)?;
    let cache = AppCache::new();

    tokio::spawn(start_cache_warmer(cache.clone(), api.clone()));

    let state = AppState {
        api,
        cache,
        policy: config.policy,
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
