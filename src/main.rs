use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use masterclass_web::{
    cache::CacheWarmer,
    config::Config,
    content::FallbackContent,
    countdown::TimeRemaining,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("masterclass_web=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Lazy so the site still starts (on fallback content) without a database
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(&config.database_url)
        .context("Invalid DATABASE_URL")?;

    if config.run_migrations {
        info!("Running migrations...");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("Migrations failed")?;
    }

    let fallback = FallbackContent::load(config.fallback_content_path.as_deref())?;
    let address = config.bind_address();
    let refresh = config.content_refresh;

    info!(live_content = config.live_content, "Initializing state...");
    let state = AppState::new(config, db, fallback);
    let _warmer = CacheWarmer::spawn(
        state.cache.clone(),
        Arc::clone(&state.content),
        Arc::clone(&state.countdown),
        refresh,
    );

    let remaining = TimeRemaining::until(state.countdown.target(), Utc::now());
    info!("Event starts in {} days", remaining.days);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, masterclass_web::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
