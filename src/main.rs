//! Visage HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use visage::cache::CacheStore;
use visage::config::Config;
use visage::embedding::HttpFaceExtractor;
use visage::gateway::{HandlerState, create_router_with_state};
use visage::store::FirestoreStore;
use visage::sync::{HttpAvatarFetcher, SyncConfig, SyncOrchestrator};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        extractor = %config.extractor_url,
        "Visage starting"
    );

    let project = config
        .store_project
        .clone()
        .context("VISAGE_STORE_PROJECT must be set")?;
    let store = FirestoreStore::new(
        config.store_url.clone(),
        project,
        config.store_collection.clone(),
        config.store_token.clone(),
    )?;
    let fetcher = HttpAvatarFetcher::new(config.avatar_timeout, config.insecure_avatar_tls)?;
    let extractor = Arc::new(HttpFaceExtractor::new(config.extractor_url.clone())?);

    let cache = Arc::new(CacheStore::new());
    let orchestrator = Arc::new(SyncOrchestrator::new(
        Arc::clone(&cache),
        Arc::new(store),
        Arc::new(fetcher),
        extractor.clone(),
        SyncConfig::from(&config),
    ));

    tracing::info!("Loading enrollments from store...");
    let report = orchestrator
        .sync()
        .await
        .context("initial enrollment sync failed")?;
    tracing::info!(%report, loaded_faces = cache.len(), "Enrollment cache ready");

    let state =
        HandlerState::new(orchestrator, extractor).with_max_upload_bytes(config.max_upload_bytes);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Visage shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = Config::from_env()
        .map(|c| c.port)
        .unwrap_or(Config::default().port);

    let url = format!("http://127.0.0.1:{}/", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
