mod api;
mod config;
mod db;
mod error;
mod service;
mod state;
mod types;
mod utils;

use std::{path::Path, sync::Arc};

use dotenvy::dotenv;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    api::{auth::AdminKey, routes},
    config::{Config, LogConfig, LogFormat},
    db::{MemoryStore, RedisStore, Store, StoreResult},
    service::LinkService,
    state::AppState,
};

const DEFAULT_TRACING_LEVEL: &str = "linkkv=debug,tower_http=info";
const LOG_FILE_NAME: &str = "linkkv.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let _log_guard = configure_tracing(&LogConfig::load());

    let config = Config::load();
    let store = create_store(&config)?;
    let state = AppState::new(
        LinkService::new(store),
        AdminKey::new(config.admin_key.clone()),
    );

    let listener = TcpListener::bind(&config.server_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "Listening");

    let app = routes::router(state, Path::new(&config.assets_dir));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

fn configure_tracing(log: &LogConfig) -> WorkerGuard {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_TRACING_LEVEL.into());
    let (writer, guard) = match &log.dir {
        Some(dir) => tracing_appender::non_blocking(tracing_appender::rolling::daily(
            dir,
            LOG_FILE_NAME,
        )),
        None => tracing_appender::non_blocking(std::io::stdout()),
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(log.dir.is_none());

    let registry = tracing_subscriber::registry().with(filter);
    match log.format {
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
        LogFormat::Pretty => registry.with(fmt_layer).init(),
    }
    guard
}

fn create_store(config: &Config) -> StoreResult<Arc<dyn Store>> {
    match &config.redis_url {
        Some(redis_url) => {
            let store = RedisStore::connect(redis_url, config.links_prefix.clone())?;
            info!(prefix = %config.links_prefix, "Connected to Redis");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
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
    info!("Shutdown signal received");
}
