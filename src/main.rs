use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use agro_station_service::{
    api::{self, AppState},
    auth::{AuthService, TokenIssuer},
    config::Config,
    db::{self, PgUserStore},
    reading_cache::ReadingCache,
    realtime::SnapshotPublisher,
    sensors::{self, SensorService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent; env vars may be set externally)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Telemetry is the point of this process; without the device there is nothing to relay.
    let lines = sensors::serial::open(&config.serial_port, config.serial_baud_rate)
        .context("sensor device unavailable")?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database ready");

    let tokens = TokenIssuer::new(
        config.jwt_secret.as_bytes(),
        Duration::from_secs(config.jwt_ttl_secs),
    );
    let auth =
        AuthService::new(Arc::new(PgUserStore::new(pool)), tokens, config.bcrypt_cost).await?;

    // Latest value per measurement, shared by ingest and realtime sessions
    let cache = ReadingCache::new();
    let publisher = SnapshotPublisher::default();

    tokio::spawn(SensorService::new(cache.clone(), publisher.clone()).run(lines));

    let state = AppState {
        auth,
        cache,
        publisher,
        realtime_origins: config.realtime_origins.clone(),
    };

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(state, &config.cors_origins))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
