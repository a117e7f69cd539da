//! Folio server entry point.
//!
//! Opens the document directory and credential file, then starts the Axum
//! HTTP server with graceful shutdown. A background worker sweeps expired
//! sessions alongside the server and is cancelled on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use folio_core::auth::Authenticator;
use folio_core::credentials::CredentialStore;
use folio_core::document::DocumentStore;
use folio_core::session::{SessionStore, ttl_from_secs};
use folio_storage::FsBackend;

use folio_server::config::ServerConfig;
use folio_server::routes::build_router;
use folio_server::state::AppState;
use folio_server::worker::session_prune_worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        data_dir = %config.data_dir.display(),
        users_file = %config.users_file.display(),
        "Folio starting"
    );

    let state = build_app_state(&config).await?;

    // Shutdown signal channel.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let prune_worker_handle = {
        let sessions = Arc::clone(&state.sessions);
        tokio::spawn(session_prune_worker(
            sessions,
            shutdown_rx.clone(),
            config.session_prune_interval_secs,
        ))
    };

    let app = build_router(Arc::clone(&state));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Folio server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    info!("waiting for background workers to stop");
    let _ = tokio::time::timeout(Duration::from_secs(10), prune_worker_handle).await;

    info!("Folio server stopped");
    Ok(())
}

/// Build the shared application state.
async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let backend = FsBackend::open(&config.data_dir).with_context(|| {
        format!(
            "failed to open data directory {}",
            config.data_dir.display()
        )
    })?;

    let credentials = CredentialStore::load(&config.users_file)
        .await
        .with_context(|| {
            format!(
                "failed to load credentials from {}",
                config.users_file.display()
            )
        })?;
    if credentials.is_empty() {
        warn!(
            users_file = %config.users_file.display(),
            "no users configured; nobody will be able to sign in"
        );
    } else {
        info!(users = credentials.len(), "credentials loaded");
    }

    Ok(Arc::new(AppState {
        documents: Arc::new(DocumentStore::new(Arc::new(backend))),
        authenticator: Arc::new(Authenticator::new(credentials)),
        sessions: Arc::new(SessionStore::new(ttl_from_secs(config.session_ttl_secs))),
        secure_cookie: config.secure_cookie,
    }))
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
